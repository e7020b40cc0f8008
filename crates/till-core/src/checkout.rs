//! # Checkout Math
//!
//! The pure half of the checkout workflow. Storage implementations load the
//! customer and products, call into this module, and persist the result.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Pipeline                                │
//! │                                                                         │
//! │  validate_lines(lines)            shape: ≥1 line, quantity ≥ 1          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_order(lines, catalog)      per line, in order:                   │
//! │       │                             empty id    → ProductIdRequired     │
//! │       │                             unknown id  → ProductNotFound       │
//! │       │                             qty > stock → InsufficientStock     │
//! │       │                             unavailable → ProductUnavailable    │
//! │       │                             else total += price × qty           │
//! │       ▼                                                                 │
//! │  settle_payment(total, paid, change)                                    │
//! │       │                             paid < total       → PaidNotEnough  │
//! │       │                             change ≠ paid-total → IncorrectChange│
//! │       ▼                                                                 │
//! │  plan_stock_decrements(lines, stock)                                    │
//! │       │                             missing stock row → StockNotFound   │
//! │       ▼                                                                 │
//! │  [StockDecrement { product_id, current_stock, new_stock }]              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  storage applies each as CAS: SET stock=new WHERE stock=current         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines naming the same product are summed before comparing against stock.

use std::collections::{BTreeMap, HashMap};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CheckoutOrder, OrderLine, Product};

// =============================================================================
// Types
// =============================================================================

/// One conditional stock write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDecrement {
    pub product_id: String,
    /// Stock observed when the plan was made; the write is conditioned on it.
    pub current_stock: i64,
    pub new_stock: i64,
}

/// Everything a store needs to commit an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPlan {
    pub total: Money,
    pub decrements: Vec<StockDecrement>,
}

// =============================================================================
// Order Shape
// =============================================================================

/// Checks the order has at least one line and no non-positive quantity.
pub fn validate_lines(lines: &[OrderLine]) -> CoreResult<()> {
    if lines.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    for line in lines {
        if line.quantity < 1 {
            return Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: i64::MAX,
            }
            .into());
        }
    }

    Ok(())
}

/// Distinct non-empty product ids, sorted.
///
/// Sorted order doubles as the lock order for stock writes.
pub fn distinct_product_ids(lines: &[OrderLine]) -> Vec<String> {
    let mut ids: Vec<String> = lines
        .iter()
        .filter(|line| !line.product_id.is_empty())
        .map(|line| line.product_id.clone())
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Total requested quantity per product.
pub fn demand_by_product(lines: &[OrderLine]) -> CoreResult<BTreeMap<String, i64>> {
    let mut demand: BTreeMap<String, i64> = BTreeMap::new();
    for line in lines {
        let entry = demand.entry(line.product_id.clone()).or_insert(0);
        *entry = entry
            .checked_add(line.quantity)
            .ok_or(CoreError::AmountOverflow)?;
    }
    Ok(demand)
}

// =============================================================================
// Pricing
// =============================================================================

/// Validates every line against the catalog and returns the order total.
///
/// ## Arguments
/// * `lines` - Order lines, checked in submission order
/// * `catalog` - Products keyed by id; ids absent here are "not found"
///
/// ## Returns
/// * `Ok(Money)` - Sum of `price × quantity`
/// * `Err(CoreError)` - First failing rule, see the module diagram
pub fn price_order(lines: &[OrderLine], catalog: &HashMap<String, Product>) -> CoreResult<Money> {
    let mut total = Money::zero();

    for line in lines {
        if line.product_id.is_empty() {
            return Err(CoreError::ProductIdRequired);
        }

        let product = catalog
            .get(&line.product_id)
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

        if line.quantity > product.stock {
            return Err(CoreError::InsufficientStock {
                product_id: product.id.clone(),
                available: product.stock,
                requested: line.quantity,
            });
        }

        if !product.is_available {
            return Err(CoreError::ProductUnavailable(product.id.clone()));
        }

        let line_total = product
            .unit_price()
            .checked_mul_quantity(line.quantity)
            .ok_or(CoreError::AmountOverflow)?;
        total = total
            .checked_add(line_total)
            .ok_or(CoreError::AmountOverflow)?;
    }

    // Repeated lines can each fit while their sum does not.
    for (product_id, requested) in demand_by_product(lines)? {
        if let Some(product) = catalog.get(&product_id) {
            if requested > product.stock {
                return Err(CoreError::InsufficientStock {
                    product_id,
                    available: product.stock,
                    requested,
                });
            }
        }
    }

    Ok(total)
}

// =============================================================================
// Payment
// =============================================================================

/// Checks `paid >= total` and `change == paid - total` exactly.
pub fn settle_payment(total: Money, paid: Money, change: Money) -> CoreResult<()> {
    if paid < total {
        return Err(CoreError::PaidNotEnough {
            paid: paid.minor(),
            total: total.minor(),
        });
    }

    let expected = paid.checked_sub(total).ok_or(CoreError::AmountOverflow)?;
    if change != expected {
        return Err(CoreError::IncorrectChange {
            expected: expected.minor(),
            given: change.minor(),
        });
    }

    Ok(())
}

// =============================================================================
// Stock Planning
// =============================================================================

/// Computes the new stock level for every distinct product in the order.
///
/// ## Arguments
/// * `lines` - Order lines (duplicates are summed)
/// * `stock` - Stock levels from one batched read, keyed by product id
///
/// ## Returns
/// Decrements sorted by product id. A product absent from `stock` is
/// [`CoreError::StockNotFound`], an internal consistency failure.
pub fn plan_stock_decrements(
    lines: &[OrderLine],
    stock: &HashMap<String, i64>,
) -> CoreResult<Vec<StockDecrement>> {
    demand_by_product(lines)?
        .into_iter()
        .map(|(product_id, requested)| {
            let current = *stock
                .get(&product_id)
                .ok_or_else(|| CoreError::StockNotFound(product_id.clone()))?;

            let new_stock = current - requested;
            if new_stock < 0 {
                return Err(CoreError::InsufficientStock {
                    product_id,
                    available: current,
                    requested,
                });
            }

            Ok(StockDecrement {
                product_id,
                current_stock: current,
                new_stock,
            })
        })
        .collect()
}

/// Runs pricing, payment settlement and stock planning against one
/// consistent view of the catalog.
pub fn prepare_checkout(
    order: &CheckoutOrder,
    catalog: &HashMap<String, Product>,
) -> CoreResult<CheckoutPlan> {
    validate_lines(&order.lines)?;
    let total = price_order(&order.lines, catalog)?;
    settle_payment(total, order.paid, order.change)?;

    let stock: HashMap<String, i64> = catalog
        .iter()
        .map(|(id, product)| (id.clone(), product.stock))
        .collect();
    let decrements = plan_stock_decrements(&order.lines, &stock)?;

    Ok(CheckoutPlan { total, decrements })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use chrono::Utc;

    fn product(id: &str, stock: i64, price: i64, is_available: bool) -> Product {
        Product {
            id: id.to_string(),
            name: "Iced Tea".to_string(),
            sku: format!("SKU-{id}"),
            category: Category::Beverages,
            stock,
            price,
            image_url: "https://cdn.example.com/tea.png".to_string(),
            notes: "Chilled".to_string(),
            is_available,
            location: "Fridge 1".to_string(),
            created_at: Utc::now(),
        }
    }

    fn catalog(products: Vec<Product>) -> HashMap<String, Product> {
        products.into_iter().map(|p| (p.id.clone(), p)).collect()
    }

    fn line(product_id: &str, quantity: i64) -> OrderLine {
        OrderLine {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    fn order(lines: Vec<OrderLine>, paid: i64, change: i64) -> CheckoutOrder {
        CheckoutOrder {
            customer_id: "c-1".to_string(),
            lines,
            paid: Money::from_minor(paid),
            change: Money::from_minor(change),
        }
    }

    #[test]
    fn test_price_order_sums_lines() {
        let catalog = catalog(vec![product("a", 5, 1000, true), product("b", 3, 250, true)]);
        let total = price_order(&[line("a", 2), line("b", 3)], &catalog).unwrap();
        assert_eq!(total.minor(), 2750);
    }

    #[test]
    fn test_price_order_checks_rules_in_order() {
        let catalog = catalog(vec![product("a", 5, 1000, false)]);

        assert_eq!(
            price_order(&[line("", 1)], &catalog),
            Err(CoreError::ProductIdRequired)
        );
        assert_eq!(
            price_order(&[line("missing", 1)], &catalog),
            Err(CoreError::ProductNotFound("missing".to_string()))
        );
        // Over-stock is reported before unavailability.
        assert!(matches!(
            price_order(&[line("a", 6)], &catalog),
            Err(CoreError::InsufficientStock { available: 5, requested: 6, .. })
        ));
        assert_eq!(
            price_order(&[line("a", 1)], &catalog),
            Err(CoreError::ProductUnavailable("a".to_string()))
        );
    }

    #[test]
    fn test_price_order_sums_repeated_lines_against_stock() {
        let catalog = catalog(vec![product("a", 5, 1000, true)]);
        let result = price_order(&[line("a", 3), line("a", 3)], &catalog);
        assert!(matches!(
            result,
            Err(CoreError::InsufficientStock { requested: 6, .. })
        ));
    }

    #[test]
    fn test_price_order_detects_overflow() {
        let catalog = catalog(vec![product("a", 100, i64::MAX / 2, true)]);
        assert_eq!(
            price_order(&[line("a", 3)], &catalog),
            Err(CoreError::AmountOverflow)
        );
    }

    #[test]
    fn test_settle_payment() {
        let total = Money::from_minor(5000);
        assert!(settle_payment(total, Money::from_minor(5000), Money::zero()).is_ok());
        assert!(settle_payment(total, Money::from_minor(7000), Money::from_minor(2000)).is_ok());

        assert!(matches!(
            settle_payment(total, Money::from_minor(4000), Money::zero()),
            Err(CoreError::PaidNotEnough { paid: 4000, total: 5000 })
        ));
        assert!(matches!(
            settle_payment(total, Money::from_minor(7000), Money::from_minor(1000)),
            Err(CoreError::IncorrectChange { expected: 2000, given: 1000 })
        ));
    }

    #[test]
    fn test_plan_stock_decrements_aggregates_and_sorts() {
        let stock: HashMap<String, i64> =
            [("b".to_string(), 10), ("a".to_string(), 5)].into_iter().collect();
        let plan = plan_stock_decrements(&[line("b", 4), line("a", 2), line("b", 1)], &stock)
            .unwrap();

        assert_eq!(
            plan,
            vec![
                StockDecrement {
                    product_id: "a".to_string(),
                    current_stock: 5,
                    new_stock: 3
                },
                StockDecrement {
                    product_id: "b".to_string(),
                    current_stock: 10,
                    new_stock: 5
                },
            ]
        );
    }

    #[test]
    fn test_plan_stock_decrements_missing_product_is_internal() {
        let stock: HashMap<String, i64> = HashMap::new();
        let err = plan_stock_decrements(&[line("ghost", 1)], &stock).unwrap_err();
        assert_eq!(err, CoreError::StockNotFound("ghost".to_string()));
        assert_eq!(err.kind(), crate::error::ErrorKind::Internal);
    }

    #[test]
    fn test_prepare_checkout_exact_stock() {
        let catalog = catalog(vec![product("a", 5, 1000, true)]);
        let plan = prepare_checkout(&order(vec![line("a", 5)], 5000, 0), &catalog).unwrap();

        assert_eq!(plan.total.minor(), 5000);
        assert_eq!(plan.decrements[0].new_stock, 0);
    }

    #[test]
    fn test_prepare_checkout_rejects_bad_shapes() {
        let catalog = catalog(vec![product("a", 5, 1000, true)]);
        assert_eq!(
            prepare_checkout(&order(vec![], 0, 0), &catalog),
            Err(CoreError::EmptyOrder)
        );
        assert!(matches!(
            prepare_checkout(&order(vec![line("a", 0)], 0, 0), &catalog),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_distinct_product_ids() {
        let ids = distinct_product_ids(&[line("b", 1), line("a", 1), line("b", 2), line("", 1)]);
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }
}
