//! Restock dialog state machine.
//!
//! ```text
//! idle ──submit──▶ validating ──▶ submitting ──▶ succeeded (closes the dialog)
//!  ▲                   │               │
//!  └──── rejected ─────┘               └──▶ failed (editable; next edit → idle)
//! ```
//!
//! `submit` takes `&mut self`, so a second submission cannot start while one is
//! in flight. Closing the dialog (from anywhere holding a [`DialogHandle`])
//! does not cancel an in-flight lookup, but its result is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use tillpoint_core::{RemoteError, RemoteResult, StoreId};
use tillpoint_products::Product;
use tillpoint_purchasing::{NewPurchaseOrder, PurchaseOrder};
use tillpoint_suppliers::{DEFAULT_PAGE_SIZE, Supplier};

use crate::error::RestockError;
use crate::form::{FormEdit, RestockForm};
use crate::lookup::SupplierCostLookup;
use crate::ports::{BackOffice, Notifier, SessionProvider};
use crate::quick_order::QuickRestock;

/// Dialog lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestockState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed { message: String },
}

impl RestockState {
    pub fn name(&self) -> &'static str {
        match self {
            RestockState::Idle => "idle",
            RestockState::Validating => "validating",
            RestockState::Submitting => "submitting",
            RestockState::Succeeded => "succeeded",
            RestockState::Failed { .. } => "failed",
        }
    }

    /// Whether the operator may edit, submit or dismiss.
    pub fn is_editable(&self) -> bool {
        matches!(self, RestockState::Idle | RestockState::Failed { .. })
    }
}

/// Liveness flag shared between a dialog and whoever may close it.
#[derive(Debug, Clone)]
pub struct DialogHandle {
    open: Arc<AtomicBool>,
}

impl DialogHandle {
    fn new() -> Self {
        Self {
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }
}

/// Tunables of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestockSettings {
    pub supplier_page_size: u32,
    /// `None` waits for the back-office indefinitely.
    pub submit_timeout: Option<Duration>,
}

impl Default for RestockSettings {
    fn default() -> Self {
        Self {
            supplier_page_size: DEFAULT_PAGE_SIZE,
            submit_timeout: None,
        }
    }
}

/// Injected collaborators shared by every dialog.
#[derive(Clone)]
pub struct RestockContext {
    pub back_office: Arc<dyn BackOffice>,
    pub session: Arc<dyn SessionProvider>,
    pub notifier: Arc<dyn Notifier>,
    pub settings: RestockSettings,
}

impl RestockContext {
    pub fn new(
        back_office: Arc<dyn BackOffice>,
        session: Arc<dyn SessionProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            back_office,
            session,
            notifier,
            settings: RestockSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: RestockSettings) -> Self {
        self.settings = settings;
        self
    }
}

type CompletionCallback = Box<dyn FnMut(&PurchaseOrder) + Send>;

/// One open "add stock" dialog for a product.
pub struct RestockDialog {
    ctx: RestockContext,
    store_id: StoreId,
    product: Product,
    form: RestockForm,
    suppliers: Vec<Supplier>,
    state: RestockState,
    handle: DialogHandle,
    idempotency_key: Uuid,
    on_complete: Option<CompletionCallback>,
}

impl RestockDialog {
    /// Open a dialog with catalog defaults. Call [`prefill`](Self::prefill) to
    /// load suppliers and the supply hint.
    pub fn open(ctx: RestockContext, store_id: StoreId, product: Product) -> Self {
        let form = RestockForm::for_product(&product);
        tracing::debug!(store_id = %store_id, product_id = %product.id, "restock dialog opened");
        Self {
            ctx,
            store_id,
            product,
            form,
            suppliers: Vec::new(),
            state: RestockState::Idle,
            handle: DialogHandle::new(),
            idempotency_key: Uuid::now_v7(),
            on_complete: None,
        }
    }

    /// Callback run once, after the order has been created.
    pub fn on_complete(mut self, callback: impl FnMut(&PurchaseOrder) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn handle(&self) -> DialogHandle {
        self.handle.clone()
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    pub fn state(&self) -> &RestockState {
        &self.state
    }

    pub fn form(&self) -> &RestockForm {
        &self.form
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    /// Key sent with create attempts; replaced whenever an edit changes the form.
    pub fn idempotency_key(&self) -> Uuid {
        self.idempotency_key
    }

    /// Load suppliers and the last supply hint into the form.
    ///
    /// Returns `false` when the dialog was closed before the lookup finished;
    /// the result is then discarded and nothing is announced.
    pub async fn prefill(&mut self) -> bool {
        let lookup = SupplierCostLookup::new(
            self.ctx.back_office.as_ref(),
            self.ctx.notifier.as_ref(),
            self.ctx.settings.supplier_page_size,
        );
        let hint = lookup.fetch(self.store_id, self.product.id).await;

        if !self.handle.is_open() {
            tracing::debug!(product_id = %self.product.id, "dialog closed, discarding lookup result");
            return false;
        }

        lookup.announce(&hint);
        if let Some(info) = &hint.last_supply {
            self.form.apply_hint(info);
        }
        self.suppliers = hint.suppliers;
        true
    }

    pub fn edit(&mut self, edit: FormEdit) -> Result<(), RestockError> {
        self.ensure_editable()?;
        tracing::debug!(?edit, "restock form edited");
        let before = self.form.clone();
        self.form.apply(edit);
        if self.form != before {
            // A changed order is a new request; the old key may already be committed.
            self.idempotency_key = Uuid::now_v7();
        }
        if matches!(self.state, RestockState::Failed { .. }) {
            self.transition(RestockState::Idle);
        }
        Ok(())
    }

    /// Close the dialog without submitting.
    pub fn dismiss(&mut self) -> Result<(), RestockError> {
        self.ensure_editable()?;
        self.handle.close();
        Ok(())
    }

    /// Validate, build and submit the quick-restock order.
    pub async fn submit(&mut self) -> Result<PurchaseOrder, RestockError> {
        self.ensure_editable()?;
        self.transition(RestockState::Validating);

        if self.form.supplier_id.is_none() || self.form.quantity == 0 {
            return Err(self.reject(RestockError::MissingInput));
        }

        let Some(operator) = self.ctx.session.current_operator() else {
            return Err(self.reject(RestockError::SessionNotFound));
        };

        let built = QuickRestock {
            store_id: self.store_id,
            product: &self.product,
            form: &self.form,
            operator: &operator,
            idempotency_key: self.idempotency_key,
            submitted_at: Utc::now(),
        }
        .build();
        let order = match built {
            Ok(order) => order,
            Err(err) => return Err(self.reject(err)),
        };

        self.transition(RestockState::Submitting);
        tracing::info!(
            store_id = %self.store_id,
            product_id = %self.product.id,
            quantity = self.form.quantity,
            total = %order.total_amount,
            operator = %operator.id,
            "submitting quick restock"
        );

        let outcome = Self::create(&self.ctx, order).await;
        match outcome {
            Ok(created) => {
                self.transition(RestockState::Succeeded);
                tracing::info!(order_id = %created.id, "quick restock recorded");
                self.ctx.notifier.success(&format!(
                    "Added {} units of {} to stock",
                    created.order.total_quantity(),
                    self.product.name
                ));
                if let Some(callback) = self.on_complete.as_mut() {
                    callback(&created);
                }
                self.handle.close();
                Ok(created)
            }
            Err(err) => {
                let message = err.message().to_string();
                tracing::warn!(product_id = %self.product.id, error = %err, "quick restock failed");
                self.ctx.notifier.error(&message);
                self.transition(RestockState::Failed {
                    message: message.clone(),
                });
                Err(RestockError::Submission(message))
            }
        }
    }

    async fn create(ctx: &RestockContext, order: NewPurchaseOrder) -> RemoteResult<PurchaseOrder> {
        let call = ctx.back_office.create_purchase_order(order);
        match ctx.settings.submit_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(RemoteError::transport("request timed out"))),
            None => call.await,
        }
    }

    fn ensure_editable(&self) -> Result<(), RestockError> {
        if !self.handle.is_open() {
            return Err(RestockError::NotEditable("closed"));
        }
        if !self.state.is_editable() {
            return Err(RestockError::NotEditable(self.state.name()));
        }
        Ok(())
    }

    /// Local refusal: notify, go back to idle, create nothing.
    fn reject(&mut self, err: RestockError) -> RestockError {
        tracing::info!(reason = %err, "quick restock rejected before submission");
        self.ctx.notifier.error(&err.to_string());
        self.transition(RestockState::Idle);
        err
    }

    fn transition(&mut self, next: RestockState) {
        tracing::debug!(from = self.state.name(), to = next.name(), "restock state change");
        self.state = next;
    }
}
