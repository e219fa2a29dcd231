use crate::actor_framework::{Entity, Page};
use crate::domain::{ListQuery, OrderItem, OrderItemPage};

impl Entity for OrderItem {
    type Id = String;
    type Query = ListQuery;

    fn id(&self) -> &String {
        &self.id
    }
}

impl From<OrderItemPage> for Page<OrderItem> {
    fn from(page: OrderItemPage) -> Self {
        Page {
            items: page.items,
            next_cursor: page.next_cursor,
        }
    }
}
