pub mod admins;
pub mod categories;
pub mod enums;
pub mod order_items;
pub mod orders;
pub mod pix_configs;
pub mod products;
pub mod users;

pub use admins::Entity as Admins;
pub use categories::Entity as Categories;
pub use enums::{DeliveryType, OrderStatus, PaymentMethod, PaymentStatus, UserRole};
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use pix_configs::Entity as PixConfigs;
pub use products::Entity as Products;
pub use users::Entity as Users;
