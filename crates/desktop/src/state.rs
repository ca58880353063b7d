//! Application state shared across host commands.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use uuid::Uuid;

use tillpoint_purchasing::PurchaseOrder;
use tillpoint_restock::{BackOffice, DialogHandle, RestockContext, RestockDialog};

use crate::config::DesktopConfig;
use crate::notify::ToastNotifier;
use crate::session::LocalSessionStore;

const COMPLETION_CHANNEL_CAPACITY: usize = 64;

/// Published once per successful quick restock so open views can refresh.
#[derive(Debug, Clone)]
pub struct RestockCompleted {
    pub dialog_id: Uuid,
    pub order: PurchaseOrder,
}

/// One registered dialog.
///
/// The handle lives outside the dialog lock so a dialog can be closed while
/// its lookup is still running.
#[derive(Clone)]
pub(crate) struct DialogSlot {
    pub(crate) handle: DialogHandle,
    pub(crate) dialog: Arc<tokio::sync::Mutex<RestockDialog>>,
    pub(crate) submitting: Arc<AtomicBool>,
    /// Set until the first prefill finishes.
    pub(crate) loading: Arc<AtomicBool>,
}

impl DialogSlot {
    pub(crate) fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub(crate) fn finish_loading(&self) {
        self.loading.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: DesktopConfig,
    pub back_office: Arc<dyn BackOffice>,
    pub session: Arc<LocalSessionStore>,
    pub toasts: Arc<ToastNotifier>,
    dialogs: Arc<Mutex<HashMap<Uuid, DialogSlot>>>,
    completions: broadcast::Sender<RestockCompleted>,
}

impl AppState {
    pub fn new(config: DesktopConfig, back_office: Arc<dyn BackOffice>) -> Self {
        let session = Arc::new(LocalSessionStore::new(config.session_path()));
        let (completions, _) = broadcast::channel(COMPLETION_CHANNEL_CAPACITY);
        Self {
            config,
            back_office,
            session,
            toasts: Arc::new(ToastNotifier::new()),
            dialogs: Arc::new(Mutex::new(HashMap::new())),
            completions,
        }
    }

    /// Collaborators for a new dialog, wired to this state's session and toasts.
    pub fn restock_context(&self) -> RestockContext {
        RestockContext::new(
            self.back_office.clone(),
            self.session.clone(),
            self.toasts.clone(),
        )
        .with_settings(self.config.restock_settings())
    }

    pub fn subscribe_completions(&self) -> broadcast::Receiver<RestockCompleted> {
        self.completions.subscribe()
    }

    pub fn open_dialog_count(&self) -> usize {
        self.lock_dialogs().len()
    }

    /// Close every registered dialog, including ones still loading.
    pub fn close_all_dialogs(&self) {
        let drained: Vec<DialogSlot> = self.lock_dialogs().drain().map(|(_, slot)| slot).collect();
        for slot in drained {
            slot.handle.close();
        }
    }

    pub(crate) fn completion_sender(&self) -> broadcast::Sender<RestockCompleted> {
        self.completions.clone()
    }

    pub(crate) fn register(&self, dialog_id: Uuid, dialog: RestockDialog) -> DialogSlot {
        let slot = DialogSlot {
            handle: dialog.handle(),
            dialog: Arc::new(tokio::sync::Mutex::new(dialog)),
            submitting: Arc::new(AtomicBool::new(false)),
            loading: Arc::new(AtomicBool::new(true)),
        };
        self.lock_dialogs().insert(dialog_id, slot.clone());
        slot
    }

    pub(crate) fn slot(&self, dialog_id: Uuid) -> Option<DialogSlot> {
        self.lock_dialogs().get(&dialog_id).cloned()
    }

    pub(crate) fn remove(&self, dialog_id: Uuid) -> Option<DialogSlot> {
        self.lock_dialogs().remove(&dialog_id)
    }

    fn lock_dialogs(&self) -> MutexGuard<'_, HashMap<Uuid, DialogSlot>> {
        match self.dialogs.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
