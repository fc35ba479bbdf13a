mod intent;
mod reducer;
mod state;

pub use intent::MovieIntent;
pub use reducer::MovieReducer;
pub use state::MovieViewModel;
