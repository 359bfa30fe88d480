pub mod config;
pub mod report;

pub use models::{
    Failure, FieldKind, FieldResult, FormData, FormResult, Messages, RuleOptions, RuleSet,
};
pub use validators::Validator;
