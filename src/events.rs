// src/events.rs

//! Eventos de domínio publicados depois de cada commit.
//! Quem quiser reagir (toasts, auditoria) assina o canal.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Product,
    Category,
    Client,
    Supplier,
    Order,
    Transaction,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EventAction {
    Created,
    Updated,
    Deactivated,
    Deleted,
    StockAdjusted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEvent {
    pub entity: EntityKind,
    pub entity_id: Uuid,
    pub action: EventAction,
    pub at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, entity: EntityKind, entity_id: Uuid, action: EventAction) {
        let event = DomainEvent {
            entity,
            entity_id,
            action,
            at: Utc::now(),
        };
        // Sem assinantes o envio falha; não é erro.
        if self.sender.send(event).is_err() {
            tracing::trace!(?entity, %entity_id, ?action, "Evento sem assinantes");
        }
    }
}
