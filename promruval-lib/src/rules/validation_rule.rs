use crate::config::Scope;
use crate::validators::Validator;

/// A named, scoped set of validators ready to run.
#[derive(Debug)]
pub struct ValidationRule {
    name: String,
    scope: Scope,
    validators: Vec<Box<dyn Validator>>,
}

impl ValidationRule {
    #[must_use]
    pub const fn new(name: String, scope: Scope) -> Self {
        Self {
            name,
            scope,
            validators: Vec::new(),
        }
    }

    pub fn add_validator(&mut self, validator: Box<dyn Validator>) {
        self.validators.push(validator);
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    #[must_use]
    pub fn validators(&self) -> &[Box<dyn Validator>] {
        &self.validators
    }
}
