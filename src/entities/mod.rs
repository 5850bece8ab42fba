//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod cart_item;
pub mod category;
pub mod event;
pub mod group;
pub mod kashrut;
pub mod marketer;
pub mod order;
pub mod order_item;
pub mod product;
pub mod user;
pub mod user_profile;

// Re-export specific types to avoid conflicts
pub use cart_item::{Column as CartItemColumn, Entity as CartItem, Model as CartItemModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use event::{Column as EventColumn, Entity as Event, Model as EventModel};
pub use group::{Column as GroupColumn, Entity as Group, Model as GroupModel};
pub use kashrut::{Column as KashrutColumn, Entity as Kashrut, Model as KashrutModel};
pub use marketer::{Column as MarketerColumn, Entity as Marketer, Model as MarketerModel};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use order_item::{Column as OrderItemColumn, Entity as OrderItem, Model as OrderItemModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
pub use user_profile::{
    Column as UserProfileColumn, Entity as UserProfile, Model as UserProfileModel,
};
