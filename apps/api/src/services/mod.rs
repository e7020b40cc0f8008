//! Business services behind the HTTP routes.
//!
//! Each service owns an `Arc<dyn Store>` and turns request DTOs into domain
//! calls. Routes stay thin: extract, call a service, wrap the result.

pub mod checkout_service;
pub mod customer_service;
pub mod product_service;
pub mod staff_service;

pub use checkout_service::CheckoutService;
pub use customer_service::CustomerService;
pub use product_service::ProductService;
pub use staff_service::StaffService;
