//! Backend commands queued from UI to backend worker.

pub enum BackendCommand {
    AddProduct { product_id: String },
    ClearBasket,
    RefreshBasket,
}
