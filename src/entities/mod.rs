//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod delivery;
pub mod delivery_item;
pub mod event;
pub mod event_item;
pub mod flavor;
pub mod lifecycle;

// Re-export specific types to avoid conflicts
pub use delivery::{Column as DeliveryColumn, Entity as Delivery, Model as DeliveryModel};
pub use delivery_item::{
    Column as DeliveryItemColumn, Entity as DeliveryItem, Model as DeliveryItemModel,
};
pub use event::{Column as EventColumn, Entity as Event, Model as EventModel};
pub use event_item::{Column as EventItemColumn, Entity as EventItem, Model as EventItemModel};
pub use flavor::{Column as FlavorColumn, Entity as Flavor, Model as FlavorModel};
pub use lifecycle::Lifecycle;
