pub mod budget;
pub mod enums;
pub mod filing;

pub use budget::BudgetRecord;
pub use enums::*;
pub use filing::Filing;
