//! Grouping a coffee run into identical orders for the barista.
//!
//! Orders sort by (size, iced, type, decaf, strength, milk, sugar), with
//! small sorting alongside regular since some cafes only have two sizes.
//! Adjacent orders that are identical once an unset size is filled in as
//! Regular form a group.

use crate::attribute::Attribute;
use crate::order::{Order, DEFAULT_SIZE};

const SORT_ORDER: [Attribute; 7] = [
    Attribute::Size,
    Attribute::Iced,
    Attribute::Type,
    Attribute::Decaf,
    Attribute::Strength,
    Attribute::Milk,
    Attribute::Sugar,
];

/// A run of identical orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderGroup {
    /// The shared order, with size filled in.
    pub order: Order,
    /// Positions of the members in the input slice.
    pub members: Vec<usize>,
}

impl OrderGroup {
    pub fn count(&self) -> usize {
        self.members.len()
    }
}

fn sort_key(order: &Order) -> [&str; 7] {
    SORT_ORDER.map(|attribute| match (attribute, order.get(attribute)) {
        (Attribute::Size, None | Some("Small")) => DEFAULT_SIZE,
        (_, value) => value.unwrap_or(""),
    })
}

/// Group `orders`. The sort is stable, so members keep their input order.
pub fn group_orders(orders: &[Order]) -> Vec<OrderGroup> {
    let mut indices: Vec<usize> = (0..orders.len()).collect();
    indices.sort_by_key(|&i| sort_key(&orders[i]));

    let mut groups: Vec<OrderGroup> = Vec::new();
    for i in indices {
        let normalized = orders[i].with_default_size();
        match groups.last_mut() {
            Some(group) if group.order == normalized => group.members.push(i),
            _ => groups.push(OrderGroup {
                order: normalized,
                members: vec![i],
            }),
        }
    }
    groups
}
