use std::sync::{Arc, Mutex};
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::{CartError, CartItem, CartLines, CartStorage, sync};
use crate::{
    config::default_delivery_fee, dto::orders::CreateOrderItem, entity::DeliveryType,
    models::Product,
};

pub const STORAGE_KEY: &str = "aero-delivery-cart";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct CartOptions {
    pub debounce: Duration,
    pub delivery_fee: Decimal,
}

impl Default for CartOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            delivery_fee: default_delivery_fee(),
        }
    }
}

struct Snapshot {
    seq: u64,
    /// `None` for an empty cart, which clears the stored key.
    payload: Option<String>,
}

enum Command {
    Persist(Snapshot),
    Flush(oneshot::Sender<Result<(), CartError>>),
}

/// Serializes writes so an older snapshot can never overwrite a newer one,
/// whichever path (debounced or immediate) gets there first.
#[derive(Clone)]
struct Writer {
    storage: Arc<dyn CartStorage>,
    last_written: Arc<Mutex<u64>>,
}

impl Writer {
    fn write(&self, snapshot: Snapshot) -> Result<(), CartError> {
        let mut last = match self.last_written.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if snapshot.seq <= *last {
            return Ok(());
        }
        match &snapshot.payload {
            Some(payload) => self.storage.save(STORAGE_KEY, payload)?,
            None => self.storage.remove(STORAGE_KEY)?,
        }
        *last = snapshot.seq;
        Ok(())
    }
}

/// Cart with local persistence. Mutations are applied in memory at once and
/// written out after `debounce` of quiet; `add_item` is written immediately.
///
/// Must be opened inside a tokio runtime.
pub struct CartStore {
    lines: CartLines,
    delivery_fee: Decimal,
    seq: u64,
    writer: Writer,
    tx: mpsc::UnboundedSender<Command>,
}

impl CartStore {
    pub fn open(storage: Arc<dyn CartStorage>, options: CartOptions) -> Self {
        let lines = match storage.load(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(items) => CartLines::from_items(items),
                Err(err) => {
                    tracing::warn!(error = %err, "stored cart is corrupt, starting empty");
                    CartLines::default()
                }
            },
            Ok(None) => CartLines::default(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored cart, starting empty");
                CartLines::default()
            }
        };

        let writer = Writer {
            storage,
            last_written: Arc::new(Mutex::new(0)),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        // Dropping the store closes the channel; the worker writes its last snapshot and exits.
        tokio::spawn(run_persister(writer.clone(), rx, options.debounce));

        Self {
            lines,
            delivery_fee: options.delivery_fee,
            seq: 0,
            writer,
            tx,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        self.lines.items()
    }

    pub fn add_item(&mut self, product: &Product) -> Result<(), CartError> {
        self.lines.add(product);
        let snapshot = self.snapshot()?;
        self.writer.write(snapshot)
    }

    pub fn update_quantity(&mut self, product_id: Uuid, delta: i64) {
        if self.lines.update_quantity(product_id, delta) {
            self.schedule_persist();
        }
    }

    pub fn update_notes(&mut self, product_id: Uuid, notes: &str) {
        if self.lines.update_notes(product_id, notes) {
            self.schedule_persist();
        }
    }

    pub fn remove_item(&mut self, product_id: Uuid) {
        if self.lines.remove(product_id) {
            self.schedule_persist();
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.schedule_persist();
    }

    pub fn total_price(&self, delivery_type: DeliveryType) -> Decimal {
        self.lines.total_price(delivery_type, self.delivery_fee)
    }

    pub fn item_count(&self) -> u64 {
        self.lines.item_count()
    }

    /// Reconcile with the live catalog and keep only what still exists.
    /// Returns the names of entries that were dropped.
    pub fn synchronize(&mut self, catalog: &[Product]) -> Vec<String> {
        let outcome = sync::synchronize(self.lines.items(), catalog);
        let lines = CartLines::from_items(outcome.synchronized);
        if lines != self.lines {
            self.lines = lines;
            self.schedule_persist();
        }
        outcome.unmatched
    }

    /// Line items for `POST /api/orders`.
    pub fn checkout_items(&self) -> Vec<CreateOrderItem> {
        self.lines
            .items()
            .iter()
            .map(|item| CreateOrderItem {
                product_id: item.product_id,
                quantity: i32::try_from(item.quantity).unwrap_or(i32::MAX),
                unit_price: Some(item.price),
                notes: Some(item.notes.trim().to_string()).filter(|n| !n.is_empty()),
            })
            .collect()
    }

    /// Write any pending snapshot now and wait for it.
    pub async fn flush(&self) -> Result<(), CartError> {
        let (ack, done) = oneshot::channel();
        if self.tx.send(Command::Flush(ack)).is_err() {
            return Ok(());
        }
        done.await.unwrap_or(Ok(()))
    }

    fn snapshot(&mut self) -> Result<Snapshot, CartError> {
        self.seq += 1;
        let payload = if self.lines.is_empty() {
            None
        } else {
            Some(serde_json::to_string(self.lines.items())?)
        };
        Ok(Snapshot {
            seq: self.seq,
            payload,
        })
    }

    fn schedule_persist(&mut self) {
        match self.snapshot() {
            Ok(snapshot) => {
                if self.tx.send(Command::Persist(snapshot)).is_err() {
                    tracing::debug!("cart persister has stopped, dropping snapshot");
                }
            }
            Err(err) => tracing::warn!(error = %err, "could not encode cart snapshot"),
        }
    }
}

async fn run_persister(
    writer: Writer,
    mut rx: mpsc::UnboundedReceiver<Command>,
    window: Duration,
) {
    let mut pending: Option<Snapshot> = None;
    loop {
        let command = if pending.is_some() {
            match tokio::time::timeout(window, rx.recv()).await {
                Ok(command) => command,
                Err(_) => {
                    if let Some(snapshot) = pending.take() {
                        if let Err(err) = writer.write(snapshot) {
                            tracing::warn!(error = %err, "debounced cart write failed");
                        }
                    }
                    continue;
                }
            }
        } else {
            rx.recv().await
        };

        match command {
            Some(Command::Persist(snapshot)) => pending = Some(snapshot),
            Some(Command::Flush(ack)) => {
                let result = match pending.take() {
                    Some(snapshot) => writer.write(snapshot),
                    None => Ok(()),
                };
                let _ = ack.send(result);
            }
            None => {
                if let Some(snapshot) = pending.take() {
                    if let Err(err) = writer.write(snapshot) {
                        tracing::warn!(error = %err, "final cart write failed");
                    }
                }
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{MemoryStorage, test_support::product};

    fn open(storage: &MemoryStorage) -> CartStore {
        CartStore::open(Arc::new(storage.clone()), CartOptions::default())
    }

    fn stored(storage: &MemoryStorage) -> Vec<CartItem> {
        let raw = storage.get(STORAGE_KEY).expect("cart stored");
        serde_json::from_str(&raw).expect("valid cart json")
    }

    #[tokio::test(start_paused = true)]
    async fn add_item_is_persisted_before_returning() {
        let storage = MemoryStorage::new();
        let mut cart = open(&storage);
        cart.add_item(&product("X-Burger", 3590)).unwrap();

        assert_eq!(storage.writes(), 1);
        assert_eq!(stored(&storage)[0].quantity, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_updates_coalesce_into_one_write() {
        let storage = MemoryStorage::new();
        let burger = product("X-Burger", 3590);
        let mut cart = open(&storage);
        cart.add_item(&burger).unwrap();
        assert_eq!(storage.writes(), 1);

        cart.update_quantity(burger.id, 1);
        tokio::time::sleep(Duration::from_millis(100)).await;
        cart.update_quantity(burger.id, 1);
        tokio::time::sleep(Duration::from_millis(100)).await;
        cart.update_quantity(burger.id, 1);
        assert_eq!(storage.writes(), 1);

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(storage.writes(), 2);
        assert_eq!(stored(&storage)[0].quantity, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_writes_pending_changes() {
        let storage = MemoryStorage::new();
        let burger = product("X-Burger", 3590);
        let mut cart = open(&storage);
        cart.add_item(&burger).unwrap();
        cart.update_notes(burger.id, "sem cebola");

        cart.flush().await.unwrap();
        assert_eq!(storage.writes(), 2);
        assert_eq!(stored(&storage)[0].notes, "sem cebola");

        cart.flush().await.unwrap();
        assert_eq!(storage.writes(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_debounced_snapshot_never_overwrites_add() {
        let storage = MemoryStorage::new();
        let burger = product("X-Burger", 3590);
        let soda = product("Refrigerante", 700);
        let mut cart = open(&storage);
        cart.add_item(&burger).unwrap();
        cart.update_quantity(burger.id, 2);
        cart.add_item(&soda).unwrap();

        tokio::time::sleep(Duration::from_millis(400)).await;
        let items = stored(&storage);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn corrupt_payload_loads_as_empty_cart() {
        let storage = MemoryStorage::new();
        storage.insert_raw(STORAGE_KEY, "{not json");
        let cart = open(&storage);
        assert!(cart.items().is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reopening_restores_items() {
        let storage = MemoryStorage::new();
        let burger = product("X-Burger", 3590);
        {
            let mut cart = open(&storage);
            cart.add_item(&burger).unwrap();
            cart.add_item(&burger).unwrap();
        }
        let cart = open(&storage);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_price(DeliveryType::Delivery), Decimal::new(7980, 2));
    }

    #[tokio::test(start_paused = true)]
    async fn checkout_items_carry_quantity_and_notes() {
        let storage = MemoryStorage::new();
        let burger = product("X-Burger", 3590);
        let mut cart = open(&storage);
        cart.add_item(&burger).unwrap();
        cart.update_quantity(burger.id, 1);
        cart.update_notes(burger.id, "  bem passado ");

        let items = cart.checkout_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, burger.id);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].unit_price, Some(Decimal::new(3590, 2)));
        assert_eq!(items[0].notes.as_deref(), Some("bem passado"));
    }

    #[tokio::test(start_paused = true)]
    async fn remove_and_synchronize_update_storage() {
        let storage = MemoryStorage::new();
        let burger = product("X-Burger", 3590);
        let soda = product("Refrigerante", 700);
        let mut cart = open(&storage);
        cart.add_item(&burger).unwrap();
        cart.add_item(&soda).unwrap();

        cart.remove_item(soda.id);
        cart.remove_item(Uuid::new_v4());
        assert_eq!(cart.item_count(), 1);

        let mut renamed = burger.clone();
        renamed.name = "X-Burger Duplo".into();
        let unmatched = cart.synchronize(&[renamed]);
        assert!(unmatched.is_empty());

        cart.flush().await.unwrap();
        let items = stored(&storage);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "X-Burger Duplo");
    }

    #[tokio::test(start_paused = true)]
    async fn clear_empties_the_stored_cart() {
        let storage = MemoryStorage::new();
        let mut cart = open(&storage);
        cart.add_item(&product("X-Burger", 3590)).unwrap();
        cart.clear();
        cart.flush().await.unwrap();
        assert_eq!(storage.get(STORAGE_KEY), None);
        assert_eq!(open(&storage).item_count(), 0);
    }
}
