//! Data models shared between server and clients

pub mod category;
pub mod menu_item;
pub mod notification;
pub mod order;
pub mod qr_token;
pub mod restaurant;
pub mod staff;

pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use menu_item::{AvailabilityUpdate, MenuItem, MenuItemCreate, MenuItemUpdate};
pub use notification::{Notification, NotificationAudience, NotificationKind};
pub use order::{
    Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus, PaidItem, PaymentInput,
    PaymentRecord, StatusUpdate, TableChange,
};
pub use qr_token::{QrGenerate, QrGenerated, QrToken, QrVerification};
pub use restaurant::{Restaurant, RestaurantCreate, RestaurantUpdate};
pub use staff::{Staff, StaffCreate, StaffResponse, StaffRole, StaffUpdate};
