pub mod clock;
pub mod groceries;
pub mod ids;
pub mod weekly_menus;

pub use clock::{Clock, SteppingClock, SystemClock};
pub use groceries::GroceryStore;
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use weekly_menus::WeeklyMenuStore;
