//! Host commands invoked by the UI.
//!
//! Arguments arrive as strings and errors leave as strings; everything in
//! between is typed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use uuid::Uuid;

use tillpoint_core::{Money, ProductId, StoreId};
use tillpoint_products::{Product, StockLevel};
use tillpoint_purchasing::PurchaseOrder;
use tillpoint_restock::{FormEdit, Operator, RestockDialog, RestockForm, RestockState};
use tillpoint_suppliers::Supplier;

use crate::notify::Toast;
use crate::state::{AppState, DialogSlot, RestockCompleted};

/// Snapshot of a dialog for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockDialogView {
    pub dialog_id: Uuid,
    pub product: Product,
    pub stock_level: StockLevel,
    pub suppliers: Vec<Supplier>,
    pub form: RestockForm,
    pub line_total: Option<Money>,
    pub state: &'static str,
    /// Message of the last failed submission, until the next edit.
    pub error: Option<String>,
}

impl RestockDialogView {
    fn of(dialog_id: Uuid, dialog: &RestockDialog) -> Self {
        let error = match dialog.state() {
            RestockState::Failed { message } => Some(message.clone()),
            _ => None,
        };
        Self {
            dialog_id,
            product: dialog.product().clone(),
            stock_level: dialog.product().stock_level(),
            suppliers: dialog.suppliers().to_vec(),
            form: dialog.form().clone(),
            line_total: dialog.form().line_total(),
            state: dialog.state().name(),
            error,
        }
    }
}

/// Open the "add stock" dialog for a product and prefill it.
pub async fn open_restock(
    state: &AppState,
    store_id: String,
    product_id: String,
) -> Result<RestockDialogView, String> {
    let store_id = store_id
        .parse::<StoreId>()
        .map_err(|e| format!("Invalid store_id: {}", e))?;
    let product_id = product_id
        .parse::<ProductId>()
        .map_err(|e| format!("Invalid product_id: {}", e))?;

    let product = state
        .back_office
        .get_product(store_id, product_id)
        .await
        .map_err(|e| {
            tracing::warn!(store_id = %store_id, product_id = %product_id, error = %e, "product lookup failed");
            e.message().to_string()
        })?;

    let dialog_id = Uuid::now_v7();
    let completions = state.completion_sender();
    let dialog = RestockDialog::open(state.restock_context(), store_id, product).on_complete(
        move |order| {
            // No subscribers is fine.
            let _ = completions.send(RestockCompleted {
                dialog_id,
                order: order.clone(),
            });
        },
    );

    let slot = state.register(dialog_id, dialog);
    let mut dialog = slot.dialog.lock().await;
    let prefilled = dialog.prefill().await;
    slot.finish_loading();
    if !prefilled {
        state.remove(dialog_id);
        return Err("restock dialog was closed".to_string());
    }

    tracing::info!(%dialog_id, product_id = %product_id, "restock dialog ready");
    Ok(RestockDialogView::of(dialog_id, &dialog))
}

pub async fn edit_restock(
    state: &AppState,
    dialog_id: String,
    edit: FormEdit,
) -> Result<RestockDialogView, String> {
    let (dialog_id, slot) = find_dialog(state, &dialog_id)?;
    let mut dialog = slot
        .dialog
        .try_lock()
        .map_err(|_| "restock dialog is busy".to_string())?;
    dialog.edit(edit).map_err(|e| e.to_string())?;
    Ok(RestockDialogView::of(dialog_id, &dialog))
}

/// Submit the dialog. On failure the dialog stays open with its values.
pub async fn submit_restock(state: &AppState, dialog_id: String) -> Result<PurchaseOrder, String> {
    let (dialog_id, slot) = find_dialog(state, &dialog_id)?;
    let mut dialog = slot
        .dialog
        .try_lock()
        .map_err(|_| "restock is already being submitted".to_string())?;

    let _submitting = SubmittingFlag::raise(&slot.submitting);
    let order = dialog.submit().await.map_err(|e| e.to_string())?;
    state.remove(dialog_id);
    Ok(order)
}

/// Dismiss the dialog without submitting.
pub async fn close_restock(state: &AppState, dialog_id: String) -> Result<(), String> {
    let (dialog_id, slot) = find_dialog(state, &dialog_id)?;
    if slot.is_submitting() {
        return Err("restock dialog is submitting".to_string());
    }

    if slot.is_loading() {
        // The late lookup result will be discarded.
        slot.handle.close();
    } else {
        let mut dialog = slot
            .dialog
            .try_lock()
            .map_err(|_| "restock dialog is busy".to_string())?;
        dialog.dismiss().map_err(|e| e.to_string())?;
    }
    state.remove(dialog_id);
    tracing::debug!(%dialog_id, "restock dialog closed");
    Ok(())
}

pub async fn drain_toasts(state: &AppState) -> Result<Vec<Toast>, String> {
    Ok(state.toasts.drain())
}

pub async fn sign_in(state: &AppState, operator: Operator) -> Result<(), String> {
    if operator.name.trim().is_empty() {
        return Err("operator name is required".to_string());
    }
    state
        .session
        .save(&operator)
        .map_err(|e| format!("Failed to sign in: {:#}", e))
}

/// Sign out and close every open dialog.
pub async fn sign_out(state: &AppState) -> Result<(), String> {
    state.close_all_dialogs();
    state
        .session
        .clear()
        .map_err(|e| format!("Failed to sign out: {:#}", e))
}

fn find_dialog(state: &AppState, dialog_id: &str) -> Result<(Uuid, DialogSlot), String> {
    let dialog_id =
        Uuid::parse_str(dialog_id.trim()).map_err(|e| format!("Invalid dialog_id: {}", e))?;
    let slot = state
        .slot(dialog_id)
        .ok_or_else(|| "restock dialog not found".to_string())?;
    Ok((dialog_id, slot))
}

struct SubmittingFlag(Arc<AtomicBool>);

impl SubmittingFlag {
    fn raise(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag.clone())
    }
}

impl Drop for SubmittingFlag {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
