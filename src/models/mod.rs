pub mod area;
pub mod department;
pub mod instance;
pub mod note;
pub mod pattern;
pub mod settings;
pub mod state;
pub mod task;
pub mod template;

pub use area::*;
pub use department::*;
pub use instance::*;
pub use note::*;
pub use pattern::*;
pub use settings::*;
pub use state::*;
pub use task::*;
pub use template::*;
