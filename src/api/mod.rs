pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::ml::ClassifierService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<ClassifierService>,
}

impl AppState {
    pub fn new(classifier: Arc<ClassifierService>) -> Self {
        Self { classifier }
    }
}
