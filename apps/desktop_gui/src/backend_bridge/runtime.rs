//! Backend worker: owns the Tokio runtime, storage, and the basket manager.
//! Commands arrive over the UI queue; basket snapshots and errors flow back.

use std::thread;

use basket_core::BasketManager;
use crossbeam_channel::{Receiver, Sender};
use storage::Storage;

use crate::backend_bridge::commands::BackendCommand;
use crate::config::{self, Settings};
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || run_worker(settings, cmd_rx, ui_tx));
}

fn run_worker(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("backend worker startup failure: failed to build runtime: {err}"),
            )));
            tracing::error!("failed to build backend runtime: {err}");
            return;
        }
    };

    runtime.block_on(async move {
        let database_url = match config::prepare_database_url(&settings.database_url) {
            Ok(url) => url,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: invalid database location: {err:#}"),
                )));
                tracing::error!("failed to prepare database url: {err:#}");
                return;
            }
        };

        let storage = match Storage::new(&database_url).await {
            Ok(storage) => storage,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: could not open basket storage: {err:#}"),
                )));
                tracing::error!("failed to open basket storage at '{database_url}': {err:#}");
                return;
            }
        };

        let manager = BasketManager::new(storage);

        // Forward mutation broadcasts so a render follows every mutation.
        let mut changes = manager.subscribe_changes();
        let change_tx = ui_tx.clone();
        let forward_task = tokio::spawn(async move {
            while let Ok(changed) = changes.recv().await {
                let _ = change_tx.try_send(UiEvent::BasketUpdated {
                    entries: changed.entries,
                    saved_at: changed.saved_at,
                });
            }
        });

        push_basket_snapshot(&manager, &ui_tx).await;
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                BackendCommand::AddProduct { product_id } => {
                    if let Err(err) = manager.add(&product_id).await {
                        let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                            UiErrorContext::AddProduct,
                            format!("failed to add '{product_id}' to basket: {err:#}"),
                        )));
                    }
                }
                BackendCommand::ClearBasket => {
                    if let Err(err) = manager.clear().await {
                        let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                            UiErrorContext::ClearBasket,
                            format!("failed to clear basket: {err:#}"),
                        )));
                    }
                }
                BackendCommand::RefreshBasket => {
                    push_basket_snapshot(&manager, &ui_tx).await;
                }
            }
        }

        forward_task.abort();
    });
}

async fn push_basket_snapshot(manager: &BasketManager, ui_tx: &Sender<UiEvent>) {
    let saved_at = manager.last_saved().await.ok().flatten();
    match manager.load().await {
        Ok(entries) => {
            let _ = ui_tx.try_send(UiEvent::BasketUpdated { entries, saved_at });
        }
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::LoadBasket,
                format!("failed to load basket: {err:#}"),
            )));
        }
    }
}
