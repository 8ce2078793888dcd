//! Headless state model for the admin dashboard.
//!
//! Drives the list/add/delete flows against the gateway without owning any
//! rendering. Time is passed in explicitly (unix seconds) so banner expiry is
//! deterministic and testable.

use crate::models::Product;

/// How long a transient banner stays visible before auto-clearing.
pub const BANNER_TTL_SECS: i64 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Error(String),
}

/// Mutually exclusive view modes within the authenticated dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Tabular list with expandable detail and delete action.
    Manage,
    /// Create form.
    Add,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    /// Credential check in flight.
    Loading,
    Authenticated(View),
}

/// Create-form fields. Kept as entered so a failed submit loses nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub product_id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub price: String,
    pub launch_date: String,
    /// Previews of staged image files, uploaded on submit.
    pub staged_images: Vec<String>,
}

#[derive(Debug)]
pub struct AdminSession {
    state: SessionState,
    products: Vec<Product>,
    expanded: Option<String>,
    /// product_id of the row with a delete in flight; repeat actions on it
    /// are disabled until the call resolves.
    deleting: Option<String>,
    form: ProductForm,
    submitting: bool,
    banner: Option<(Banner, i64)>,
}

impl AdminSession {
    /// A fresh session starts in Loading while the credential is verified.
    pub fn new() -> Self {
        Self {
            state: SessionState::Loading,
            products: Vec::new(),
            expanded: None,
            deleting: None,
            form: ProductForm::default(),
            submitting: false,
            banner: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref().map(|(b, _)| b)
    }

    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_deleting(&self, product_id: &str) -> bool {
        self.deleting.as_deref() == Some(product_id)
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    /// Resolve the credential check. Success lands on the Manage view.
    pub fn authenticate(&mut self, verified: bool) {
        self.state = if verified {
            SessionState::Authenticated(View::Manage)
        } else {
            SessionState::Unauthenticated
        };
    }

    /// Switch between Manage and Add. No-op outside the authenticated state.
    pub fn select_view(&mut self, view: View) {
        if let SessionState::Authenticated(_) = self.state {
            self.state = SessionState::Authenticated(view);
            self.expanded = None;
        }
    }

    /// Replace the product list (after a fetch or post-delete refresh).
    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    /// Expand or collapse a row's detail view.
    pub fn toggle_expanded(&mut self, product_id: &str) {
        if self.expanded.as_deref() == Some(product_id) {
            self.expanded = None;
        } else {
            self.expanded = Some(product_id.to_string());
        }
    }

    /// Mark a row as deleting after the user confirms. Returns false (and does
    /// nothing) if a delete is already in flight or the session is not on the
    /// Manage view - the repeat action stays disabled.
    pub fn begin_delete(&mut self, product_id: &str) -> bool {
        if self.state != SessionState::Authenticated(View::Manage) || self.deleting.is_some() {
            return false;
        }
        if !self.products.iter().any(|p| p.product_id == product_id) {
            return false;
        }
        self.deleting = Some(product_id.to_string());
        true
    }

    /// Resolve the in-flight delete. On success the caller passes the
    /// refreshed list; on failure the row stays intact and the gateway's
    /// message is surfaced.
    pub fn finish_delete(
        &mut self,
        result: Result<Vec<Product>, String>,
        now: i64,
    ) {
        self.deleting = None;
        match result {
            Ok(refreshed) => {
                self.products = refreshed;
                self.show_banner(Banner::Success("Product deleted".into()), now);
            }
            Err(message) => {
                self.show_banner(Banner::Error(message), now);
            }
        }
    }

    /// Mutable access to the form; None while a submit is in flight (fields
    /// disabled).
    pub fn form_mut(&mut self) -> Option<&mut ProductForm> {
        if self.submitting {
            None
        } else {
            Some(&mut self.form)
        }
    }

    /// Disable the form for submission. Returns false if not on the Add view
    /// or a submit is already in flight.
    pub fn begin_submit(&mut self) -> bool {
        if self.state != SessionState::Authenticated(View::Add) || self.submitting {
            return false;
        }
        self.submitting = true;
        true
    }

    /// Resolve the in-flight submit. Success clears transient messages and
    /// resets the form; failure keeps entered data for correction.
    pub fn finish_submit(&mut self, result: Result<(), String>, now: i64) {
        self.submitting = false;
        match result {
            Ok(()) => {
                self.form = ProductForm::default();
                self.show_banner(Banner::Success("Product created".into()), now);
            }
            Err(message) => {
                self.show_banner(Banner::Error(message), now);
            }
        }
    }

    fn show_banner(&mut self, banner: Banner, now: i64) {
        self.banner = Some((banner, now + BANNER_TTL_SECS));
    }

    /// Advance time: clears any banner past its deadline.
    pub fn tick(&mut self, now: i64) {
        if let Some((_, deadline)) = self.banner {
            if now >= deadline {
                self.banner = None;
            }
        }
    }
}

impl Default for AdminSession {
    fn default() -> Self {
        Self::new()
    }
}
