//! Testing utilities and harness for the app selector

pub mod fakes;
pub mod test_rule;

pub use fakes::*;
pub use test_rule::*;

pub mod prelude {
    pub use crate::fakes::Fakes;
    pub use crate::test_rule::{has_appid, has_name, SelectorTestRule};
}
