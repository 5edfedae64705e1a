//! Editing state of the create/edit product dialog.

use super::{MutationOrchestrator, SubmitError};
use crate::model::{FieldErrors, Product, ProductDraft, ProductId, MAX_NAME_LEN};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    open: bool,
    editing: Option<Product>,
    name: String,
    price: String,
    errors: FieldErrors,
    general_error: Option<String>,
}

impl ProductForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an empty form for a new product.
    pub fn open_create(&mut self) {
        *self = Self {
            open: true,
            ..Self::default()
        };
    }

    /// Opens the form prefilled from `product`.
    pub fn open_edit(&mut self, product: &Product) {
        *self = Self {
            open: true,
            name: product.name.clone(),
            price: product.price.to_string(),
            editing: Some(product.clone()),
            ..Self::default()
        };
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn editing(&self) -> Option<&Product> {
        self.editing.as_ref()
    }

    pub fn title(&self) -> String {
        match &self.editing {
            Some(product) => format!("Edit #{}", product.id),
            None => "New Product".to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input beyond the backend's name limit is cut off.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name: String = name.into();
        self.name = name.chars().take(MAX_NAME_LEN).collect();
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn set_price(&mut self, price: impl Into<String>) {
        self.price = price.into();
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn general_error(&self) -> Option<&str> {
        self.general_error.as_deref()
    }

    /// Builds the payload: trimmed name, decimal price.
    pub fn draft(&self) -> Result<ProductDraft, FieldErrors> {
        let price = self.price.trim();
        match price.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(ProductDraft::new(self.name.trim(), value)),
            _ => {
                let message = if price.is_empty() {
                    "Price must be provided"
                } else {
                    "Price must be a number"
                };
                Err(FieldErrors::from([(
                    "price".to_string(),
                    message.to_string(),
                )]))
            }
        }
    }

    /// Submits through `orchestrator`, closing on success and keeping the
    /// form open with its errors otherwise.
    pub async fn submit(
        &mut self,
        orchestrator: &MutationOrchestrator,
    ) -> Result<Option<ProductId>, SubmitError> {
        self.errors.clear();
        self.general_error = None;

        let draft = match self.draft() {
            Ok(draft) => draft,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(SubmitError::Validation(errors));
            }
        };

        let result = orchestrator.submit(self.editing.as_ref(), draft).await;
        match &result {
            Ok(_) => self.close(),
            Err(SubmitError::Validation(errors)) => self.errors = errors.clone(),
            Err(other) => self.general_error = Some(other.to_string()),
        }
        result
    }
}
