//! Concrete back-office record types and their create/update payloads.

mod biller;
mod brand;
mod category;
mod customer;
mod store;
mod subcategory;
mod supplier;
mod unit;
mod variant_attribute;
mod warehouse;

pub use biller::{Biller, CreateBiller, UpdateBiller};
pub use brand::{Brand, CreateBrand, UpdateBrand};
pub use category::{Category, CreateCategory, UpdateCategory};
pub use customer::{CreateCustomer, Customer, UpdateCustomer, UserRole};
pub use store::{CreateStore, Store, UpdateStore};
pub use subcategory::{CreateSubCategory, SubCategory, UpdateSubCategory, CATEGORY_FILTER};
pub use supplier::{CreateSupplier, Supplier, UpdateSupplier};
pub use unit::{CreateUnit, Unit, UpdateUnit};
pub use variant_attribute::{
    parse_values, CreateVariantAttribute, UpdateVariantAttribute, VariantAttribute,
};
pub use warehouse::{CreateWarehouse, UpdateWarehouse, Warehouse};
