//! Orders service.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        catalog::{
            data::to_civil,
            models::{CustomerUuid, ItemUuid},
        },
        inventory::InventoryService,
        orders::{
            data::{OrderLineView, OrderSummary, OrderView, PaymentView},
            errors::OrdersError,
            models::{Order, OrderLine, OrderUuid, Payment, PaymentKind, PaymentUuid},
            status::OrderStatus,
        },
    },
    prices::Price,
    store::{CatalogStore, OrderFilter, OrderStore},
};

#[derive(Debug, Clone)]
pub struct OrdersService<S> {
    store: Arc<S>,
    inventory: InventoryService<S>,
}

impl<S: CatalogStore + OrderStore> OrdersService<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            inventory: InventoryService::new(Arc::clone(&store)),
            store,
        }
    }

    /// Adds `quantity` of an item to the customer's cart, opening a
    /// cart-status order implicitly when none exists.
    ///
    /// # Errors
    ///
    /// - [`OrdersError::InvalidArgument`]: `quantity` was zero.
    /// - [`OrdersError::NotFound`]: The customer or item does not exist.
    /// - [`OrdersError::Store`]: The persistence collaborator failed.
    #[tracing::instrument(
        name = "orders.service.add_to_cart",
        skip(self),
        fields(customer_uuid = %customer, item_uuid = %item, quantity),
        err
    )]
    pub async fn add_to_cart(
        &self,
        customer: CustomerUuid,
        item: ItemUuid,
        quantity: u32,
    ) -> Result<Order, OrdersError> {
        if quantity == 0 {
            return Err(OrdersError::InvalidArgument(
                "quantity must be a positive integer",
            ));
        }

        if !self.store.customer_exists(customer).await? {
            return Err(OrdersError::NotFound);
        }

        if !self.store.item_exists(item).await? {
            return Err(OrdersError::NotFound);
        }

        loop {
            let Some(mut cart) = self.open_cart(customer).await? else {
                let mut cart = Order::new_cart(customer, Timestamp::now());
                cart.merge_line(item, quantity);

                self.store.save_order(cart.clone()).await?;

                info!(order_uuid = %cart.uuid, "opened cart");

                return Ok(cart);
            };

            cart.merge_line(item, quantity);

            // The guard loses to a concurrent checkout; start over against
            // whatever cart state that left behind.
            if self
                .store
                .save_order_guarded(cart.clone(), OrderStatus::Cart)
                .await?
            {
                return Ok(cart);
            }
        }
    }

    /// Removes an item's line from the customer's open cart.
    ///
    /// # Errors
    ///
    /// - [`OrdersError::NotFound`]: The customer does not exist, has no open
    ///   cart, or the cart has no line for the item.
    /// - [`OrdersError::Store`]: The persistence collaborator failed.
    pub async fn remove_from_cart(
        &self,
        customer: CustomerUuid,
        item: ItemUuid,
    ) -> Result<Order, OrdersError> {
        if !self.store.customer_exists(customer).await? {
            return Err(OrdersError::NotFound);
        }

        loop {
            let mut cart = self
                .open_cart(customer)
                .await?
                .ok_or(OrdersError::NotFound)?;

            if !cart.remove_line(item) {
                return Err(OrdersError::NotFound);
            }

            if self
                .store
                .save_order_guarded(cart.clone(), OrderStatus::Cart)
                .await?
            {
                return Ok(cart);
            }
        }
    }

    /// Checks a cart out: commits a stock decrease for every line, then
    /// moves the order to `Pending`.
    ///
    /// All-or-nothing: if any line cannot be covered, or the order stops
    /// being a cart mid-flight, every decrease already applied is released
    /// again.
    ///
    /// # Errors
    ///
    /// - [`OrdersError::NotFound`]: No such order.
    /// - [`OrdersError::InvalidArgument`]: The cart is empty.
    /// - [`OrdersError::InvalidTransition`]: The order is not a cart.
    /// - [`OrdersError::InsufficientStock`]: A line exceeds the available
    ///   stock; nothing ends up decremented.
    /// - [`OrdersError::Store`]: The persistence collaborator failed.
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    pub async fn place_order(&self, order: OrderUuid) -> Result<Order, OrdersError> {
        let current = self
            .store
            .load_order(order)
            .await?
            .ok_or(OrdersError::NotFound)?;

        if current.status != OrderStatus::Cart {
            return Err(OrdersError::InvalidTransition {
                from: current.status,
                to: OrderStatus::Pending,
            });
        }

        if current.lines.is_empty() {
            return Err(OrdersError::InvalidArgument("cannot place an empty order"));
        }

        let mut applied: Vec<OrderLine> = Vec::with_capacity(current.lines.len());

        for line in &current.lines {
            match self
                .inventory
                .decrease_stock(line.item_uuid, line.quantity)
                .await
            {
                Ok(_) => applied.push(*line),
                Err(error) => {
                    self.release_stock(&applied).await;

                    return Err(error.into());
                }
            }
        }

        match self.transition(order, OrderStatus::Pending).await {
            Ok(placed) => {
                info!(order_uuid = %order, "order placed");

                Ok(placed)
            }
            Err(error) => {
                self.release_stock(&applied).await;

                Err(error)
            }
        }
    }

    /// Moves an order to `next`, stamping the matching status timestamp.
    ///
    /// The write is guarded by the status the validation ran against, so two
    /// racing attempts on the same order serialize: the loser re-validates
    /// from the state the winner left behind.
    ///
    /// # Errors
    ///
    /// - [`OrdersError::NotFound`]: No such order.
    /// - [`OrdersError::InvalidTransition`]: `next` is not reachable from
    ///   the current status; the order is left unchanged.
    /// - [`OrdersError::Store`]: The persistence collaborator failed.
    #[tracing::instrument(
        name = "orders.service.transition",
        skip(self),
        fields(order_uuid = %order, next = %next),
        err
    )]
    pub async fn transition(
        &self,
        order: OrderUuid,
        next: OrderStatus,
    ) -> Result<Order, OrdersError> {
        loop {
            let mut current = self
                .store
                .load_order(order)
                .await?
                .ok_or(OrdersError::NotFound)?;

            let from = current.status;

            current.apply_transition(next, Timestamp::now())?;

            if self.store.save_order_guarded(current.clone(), from).await? {
                info!(order_uuid = %order, from = %from, to = %next, "order status changed");

                return Ok(current);
            }

            debug!(order_uuid = %order, "lost status race, re-validating");
        }
    }

    /// Records the payment for a confirmed order.
    ///
    /// # Errors
    ///
    /// - [`OrdersError::NotFound`]: No such order.
    /// - [`OrdersError::InvalidArgument`]: The amount was not positive, or
    ///   the order has not been confirmed yet (or was cancelled).
    /// - [`OrdersError::PaymentAlreadyRecorded`]: The order already carries
    ///   a payment.
    /// - [`OrdersError::Store`]: The persistence collaborator failed.
    #[tracing::instrument(
        name = "orders.service.record_payment",
        skip(self),
        fields(order_uuid = %order, kind = kind.as_str()),
        err
    )]
    pub async fn record_payment(
        &self,
        order: OrderUuid,
        kind: PaymentKind,
        amount: Decimal,
    ) -> Result<Order, OrdersError> {
        let amount = Price::new(amount)
            .map_err(|_| OrdersError::InvalidArgument("payment amount must be positive"))?;

        loop {
            let mut current = self
                .store
                .load_order(order)
                .await?
                .ok_or(OrdersError::NotFound)?;

            if current.payment.is_some() {
                return Err(OrdersError::PaymentAlreadyRecorded);
            }

            if !matches!(
                current.status,
                OrderStatus::Confirmed
                    | OrderStatus::Preparation
                    | OrderStatus::Shipped
                    | OrderStatus::Delivered
            ) {
                return Err(OrdersError::InvalidArgument(
                    "order must be confirmed before payment",
                ));
            }

            current.payment = Some(Payment {
                uuid: PaymentUuid::new(),
                kind,
                paid_at: Timestamp::now(),
                amount,
            });

            let expected = current.status;

            if self
                .store
                .save_order_guarded(current.clone(), expected)
                .await?
            {
                info!(order_uuid = %order, kind = kind.as_str(), "payment recorded");

                return Ok(current);
            }
        }
    }

    /// Summaries of every order containing the item.
    ///
    /// # Errors
    ///
    /// - [`OrdersError::NotFound`]: No such item.
    /// - [`OrdersError::Store`]: The persistence collaborator failed.
    pub async fn orders_for_item(
        &self,
        item: ItemUuid,
    ) -> Result<Vec<OrderSummary>, OrdersError> {
        if !self.store.item_exists(item).await? {
            return Err(OrdersError::NotFound);
        }

        let orders = self
            .store
            .scan_orders(OrderFilter::ContainsItem(item))
            .await?;

        self.summaries(orders).await
    }

    /// Summaries of every order the customer has placed, carts included.
    ///
    /// # Errors
    ///
    /// - [`OrdersError::NotFound`]: No such customer.
    /// - [`OrdersError::Store`]: The persistence collaborator failed.
    pub async fn orders_for_customer(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<OrderSummary>, OrdersError> {
        if !self.store.customer_exists(customer).await? {
            return Err(OrdersError::NotFound);
        }

        let orders = self
            .store
            .scan_orders(OrderFilter::ByCustomer(customer))
            .await?;

        self.summaries(orders).await
    }

    /// Full detail view of one order.
    ///
    /// # Errors
    ///
    /// - [`OrdersError::NotFound`]: No such order.
    /// - [`OrdersError::Store`]: The persistence collaborator failed.
    pub async fn order_detail(&self, order: OrderUuid) -> Result<OrderView, OrdersError> {
        let order = self
            .store
            .load_order(order)
            .await?
            .ok_or(OrdersError::NotFound)?;

        let mut lines = Vec::with_capacity(order.lines.len());

        for line in &order.lines {
            let item = self.store.load_item(line.item_uuid).await?;

            lines.push(OrderLineView {
                item_uuid: line.item_uuid,
                name: item.as_ref().map(|i| i.name.clone()),
                quantity: line.quantity,
                unit_price: item.map(|i| i.price),
            });
        }

        let total_price = self.total_price(&order).await?;

        Ok(OrderView {
            uuid: order.uuid,
            customer_uuid: order.customer_uuid,
            status: order.status,
            created_at: to_civil(order.created_at),
            confirmed_at: order.confirmed_at.map(to_civil),
            preparation_started_at: order.preparation_started_at.map(to_civil),
            shipped_at: order.shipped_at.map(to_civil),
            delivered_at: order.delivered_at.map(to_civil),
            cancelled_at: order.cancelled_at.map(to_civil),
            lines,
            payment: order.payment.as_ref().map(|payment| PaymentView {
                uuid: payment.uuid,
                kind: payment.kind,
                paid_at: to_civil(payment.paid_at),
                amount: payment.amount,
            }),
            total_price,
            last_updated_at: to_civil(order.last_updated_at()),
        })
    }

    /// Recomputes the order total from each line item's current price.
    ///
    /// Never captured at order time: repricing an item retroactively changes
    /// what past orders report. Lines whose item has been removed from the
    /// catalog contribute nothing.
    ///
    /// # Errors
    ///
    /// - [`OrdersError::Store`]: The persistence collaborator failed.
    pub async fn total_price(&self, order: &Order) -> Result<Decimal, OrdersError> {
        let mut total = Decimal::ZERO;

        for line in &order.lines {
            match self.store.load_item(line.item_uuid).await? {
                Some(item) => total += item.price.line_total(line.quantity),
                None => {
                    debug!(item_uuid = %line.item_uuid, "order line references a removed item");
                }
            }
        }

        Ok(total)
    }

    async fn open_cart(&self, customer: CustomerUuid) -> Result<Option<Order>, OrdersError> {
        Ok(self
            .store
            .scan_orders(OrderFilter::ByCustomer(customer))
            .await?
            .into_iter()
            .find(|order| order.status == OrderStatus::Cart))
    }

    async fn summaries(&self, orders: Vec<Order>) -> Result<Vec<OrderSummary>, OrdersError> {
        let mut summaries = Vec::with_capacity(orders.len());

        for order in orders {
            let total_price = self.total_price(&order).await?;

            summaries.push(OrderSummary {
                uuid: order.uuid,
                status: order.status,
                total_price,
                last_updated_at: to_civil(order.last_updated_at()),
                customer_uuid: order.customer_uuid,
            });
        }

        Ok(summaries)
    }

    async fn release_stock(&self, lines: &[OrderLine]) {
        for line in lines {
            if let Err(error) = self
                .inventory
                .increase_stock(line.item_uuid, line.quantity)
                .await
            {
                warn!(
                    item_uuid = %line.item_uuid,
                    quantity = line.quantity,
                    %error,
                    "failed to release stock after aborted checkout"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn first_cart_item_opens_a_cart_order() -> TestResult {
        let ctx = TestContext::new().await?;
        let item = ctx.seed_item("10.00", 5).await?;

        let cart = ctx.orders.add_to_cart(ctx.customer_uuid, item, 2).await?;

        assert_eq!(cart.status, OrderStatus::Cart);
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.line(item).unwrap().quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn repeated_adds_merge_into_one_cart() -> TestResult {
        let ctx = TestContext::new().await?;
        let item = ctx.seed_item("10.00", 5).await?;
        let other = ctx.seed_item("2.00", 5).await?;

        let first = ctx.orders.add_to_cart(ctx.customer_uuid, item, 2).await?;
        let second = ctx.orders.add_to_cart(ctx.customer_uuid, item, 1).await?;
        let third = ctx.orders.add_to_cart(ctx.customer_uuid, other, 1).await?;

        assert_eq!(first.uuid, second.uuid);
        assert_eq!(second.uuid, third.uuid);
        assert_eq!(third.line(item).unwrap().quantity, 3);
        assert_eq!(third.lines.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn add_to_cart_validates_inputs() -> TestResult {
        let ctx = TestContext::new().await?;
        let item = ctx.seed_item("10.00", 5).await?;

        assert!(matches!(
            ctx.orders.add_to_cart(ctx.customer_uuid, item, 0).await,
            Err(OrdersError::InvalidArgument(_))
        ));
        assert!(matches!(
            ctx.orders
                .add_to_cart(ctx.customer_uuid, ItemUuid::new(), 1)
                .await,
            Err(OrdersError::NotFound)
        ));
        assert!(matches!(
            ctx.orders
                .add_to_cart(CustomerUuid::new(), item, 1)
                .await,
            Err(OrdersError::NotFound)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn remove_from_cart_drops_the_line() -> TestResult {
        let ctx = TestContext::new().await?;
        let item = ctx.seed_item("10.00", 5).await?;

        ctx.orders.add_to_cart(ctx.customer_uuid, item, 2).await?;

        let cart = ctx.orders.remove_from_cart(ctx.customer_uuid, item).await?;

        assert!(cart.lines.is_empty());

        // The line is gone now.
        assert!(matches!(
            ctx.orders.remove_from_cart(ctx.customer_uuid, item).await,
            Err(OrdersError::NotFound)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn remove_from_cart_without_cart_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await?;
        let item = ctx.seed_item("10.00", 5).await?;

        assert!(matches!(
            ctx.orders.remove_from_cart(ctx.customer_uuid, item).await,
            Err(OrdersError::NotFound)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn place_order_decrements_stock_and_goes_pending() -> TestResult {
        let ctx = TestContext::new().await?;
        let item = ctx.seed_item("10.00", 5).await?;

        let cart = ctx.orders.add_to_cart(ctx.customer_uuid, item, 2).await?;
        let placed = ctx.orders.place_order(cart.uuid).await?;

        assert_eq!(placed.status, OrderStatus::Pending);
        assert_eq!(ctx.inventory.stock_level(item).await?, 3);

        Ok(())
    }

    #[tokio::test]
    async fn place_order_releases_stock_when_a_line_cannot_be_covered() -> TestResult {
        let ctx = TestContext::new().await?;
        let plentiful = ctx.seed_item("10.00", 5).await?;
        let scarce = ctx.seed_item("4.00", 1).await?;

        let cart = ctx
            .orders
            .add_to_cart(ctx.customer_uuid, plentiful, 2)
            .await?;
        ctx.orders.add_to_cart(ctx.customer_uuid, scarce, 3).await?;

        let result = ctx.orders.place_order(cart.uuid).await;

        assert!(matches!(
            result,
            Err(OrdersError::InsufficientStock {
                requested: 3,
                available: 1,
            })
        ));

        // The first line's decrement was compensated.
        assert_eq!(ctx.inventory.stock_level(plentiful).await?, 5);
        assert_eq!(ctx.inventory.stock_level(scarce).await?, 1);

        // And the order is still an open cart.
        let reloaded = ctx.orders.order_detail(cart.uuid).await?;
        assert_eq!(reloaded.status, OrderStatus::Cart);

        Ok(())
    }

    #[tokio::test]
    async fn place_order_rejects_empty_cart() -> TestResult {
        let ctx = TestContext::new().await?;
        let item = ctx.seed_item("10.00", 5).await?;

        let cart = ctx.orders.add_to_cart(ctx.customer_uuid, item, 1).await?;
        ctx.orders.remove_from_cart(ctx.customer_uuid, item).await?;

        assert!(matches!(
            ctx.orders.place_order(cart.uuid).await,
            Err(OrdersError::InvalidArgument(_))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn place_order_twice_fails_and_keeps_stock() -> TestResult {
        let ctx = TestContext::new().await?;
        let item = ctx.seed_item("10.00", 5).await?;

        let cart = ctx.orders.add_to_cart(ctx.customer_uuid, item, 2).await?;
        ctx.orders.place_order(cart.uuid).await?;

        assert!(matches!(
            ctx.orders.place_order(cart.uuid).await,
            Err(OrdersError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Pending,
            })
        ));
        assert_eq!(ctx.inventory.stock_level(item).await?, 3);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_checkouts_of_one_cart_serialize() -> TestResult {
        let ctx = TestContext::new().await?;
        let item = ctx.seed_item("10.00", 5).await?;

        let cart = ctx.orders.add_to_cart(ctx.customer_uuid, item, 2).await?;

        let first = {
            let orders = ctx.orders.clone();
            let uuid = cart.uuid;
            tokio::spawn(async move { orders.place_order(uuid).await })
        };
        let second = {
            let orders = ctx.orders.clone();
            let uuid = cart.uuid;
            tokio::spawn(async move { orders.place_order(uuid).await })
        };

        let outcomes = [first.await?, second.await?];
        let successes = outcomes.iter().filter(|o| o.is_ok()).count();

        assert_eq!(successes, 1, "exactly one checkout must win");

        // The loser's decrement, if any, was released.
        assert_eq!(ctx.inventory.stock_level(item).await?, 3);

        Ok(())
    }

    #[tokio::test]
    async fn transition_walks_the_full_lifecycle() -> TestResult {
        let ctx = TestContext::new().await?;
        let item = ctx.seed_item("10.00", 5).await?;

        let cart = ctx.orders.add_to_cart(ctx.customer_uuid, item, 1).await?;
        ctx.orders.place_order(cart.uuid).await?;

        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Preparation,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            let order = ctx.orders.transition(cart.uuid, status).await?;
            assert_eq!(order.status, status);
        }

        let view = ctx.orders.order_detail(cart.uuid).await?;

        assert!(view.confirmed_at.is_some());
        assert!(view.preparation_started_at.is_some());
        assert!(view.shipped_at.is_some());
        assert!(view.delivered_at.is_some());
        assert!(view.cancelled_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn illegal_transition_leaves_order_unchanged() -> TestResult {
        let ctx = TestContext::new().await?;
        let item = ctx.seed_item("10.00", 5).await?;

        let cart = ctx.orders.add_to_cart(ctx.customer_uuid, item, 1).await?;

        let result = ctx.orders.transition(cart.uuid, OrderStatus::Shipped).await;

        assert!(matches!(
            result,
            Err(OrdersError::InvalidTransition {
                from: OrderStatus::Cart,
                to: OrderStatus::Shipped,
            })
        ));

        let view = ctx.orders.order_detail(cart.uuid).await?;

        assert_eq!(view.status, OrderStatus::Cart);
        assert!(view.shipped_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn transition_unknown_order_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await?;

        let result = ctx
            .orders
            .transition(OrderUuid::new(), OrderStatus::Pending)
            .await;

        assert!(matches!(result, Err(OrdersError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn total_price_follows_current_item_prices() -> TestResult {
        let ctx = TestContext::new().await?;
        let item_a = ctx.seed_item("10.00", 10).await?;
        let item_b = ctx.seed_item("5.50", 10).await?;

        ctx.orders.add_to_cart(ctx.customer_uuid, item_a, 2).await?;
        let cart = ctx.orders.add_to_cart(ctx.customer_uuid, item_b, 1).await?;

        let view = ctx.orders.order_detail(cart.uuid).await?;
        assert_eq!(view.total_price, "25.50".parse::<Decimal>()?);

        // Repricing an item retroactively changes the recomputed total.
        ctx.catalog
            .update_item(
                item_a,
                crate::domain::catalog::models::ItemUpdate {
                    price: Some("12.00".parse::<Decimal>()?),
                    ..Default::default()
                },
            )
            .await?;

        let repriced = ctx.orders.order_detail(cart.uuid).await?;
        assert_eq!(repriced.total_price, "29.50".parse::<Decimal>()?);

        Ok(())
    }

    #[tokio::test]
    async fn deleted_item_lines_stop_contributing_to_totals() -> TestResult {
        let ctx = TestContext::new().await?;
        let kept = ctx.seed_item("10.00", 10).await?;
        let removed = ctx.seed_item("5.50", 10).await?;

        ctx.orders.add_to_cart(ctx.customer_uuid, kept, 1).await?;
        let cart = ctx.orders.add_to_cart(ctx.customer_uuid, removed, 1).await?;

        ctx.catalog.delete_item(removed).await?;

        let view = ctx.orders.order_detail(cart.uuid).await?;

        assert_eq!(view.total_price, "10.00".parse::<Decimal>()?);

        let dead_line = view
            .lines
            .iter()
            .find(|line| line.item_uuid == removed)
            .unwrap();

        assert!(dead_line.name.is_none());
        assert!(dead_line.unit_price.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn orders_for_item_lists_containing_orders() -> TestResult {
        let ctx = TestContext::new().await?;
        let item = ctx.seed_item("10.00", 10).await?;
        let other = ctx.seed_item("2.00", 10).await?;

        let cart = ctx.orders.add_to_cart(ctx.customer_uuid, item, 2).await?;
        ctx.orders.place_order(cart.uuid).await?;

        // A second customer buys something else entirely.
        let bystander = crate::domain::catalog::models::Customer {
            uuid: CustomerUuid::new(),
            name: "Basil Browser".to_string(),
            email: "basil@example.com".to_string(),
        };
        ctx.catalog.create_customer(bystander.clone()).await?;
        ctx.orders.add_to_cart(bystander.uuid, other, 1).await?;

        let summaries = ctx.orders.orders_for_item(item).await?;

        assert_eq!(summaries.len(), 1);

        let summary = summaries.first().unwrap();

        assert_eq!(summary.uuid, cart.uuid);
        assert_eq!(summary.status, OrderStatus::Pending);
        assert_eq!(summary.customer_uuid, ctx.customer_uuid);
        assert_eq!(summary.total_price, "20.00".parse::<Decimal>()?);

        Ok(())
    }

    #[tokio::test]
    async fn orders_for_item_unknown_item_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await?;

        let result = ctx.orders.orders_for_item(ItemUuid::new()).await;

        assert!(matches!(result, Err(OrdersError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn orders_for_customer_unknown_customer_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await?;

        let result = ctx.orders.orders_for_customer(CustomerUuid::new()).await;

        assert!(matches!(result, Err(OrdersError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn payment_requires_a_confirmed_order() -> TestResult {
        let ctx = TestContext::new().await?;
        let item = ctx.seed_item("10.00", 5).await?;

        let cart = ctx.orders.add_to_cart(ctx.customer_uuid, item, 1).await?;
        ctx.orders.place_order(cart.uuid).await?;

        let early = ctx
            .orders
            .record_payment(cart.uuid, PaymentKind::Blik, "10.00".parse()?)
            .await;

        assert!(matches!(early, Err(OrdersError::InvalidArgument(_))));

        ctx.orders
            .transition(cart.uuid, OrderStatus::Confirmed)
            .await?;

        let paid = ctx
            .orders
            .record_payment(cart.uuid, PaymentKind::Blik, "10.00".parse()?)
            .await?;

        assert!(paid.payment.is_some());

        let duplicate = ctx
            .orders
            .record_payment(cart.uuid, PaymentKind::Card, "10.00".parse()?)
            .await;

        assert!(matches!(
            duplicate,
            Err(OrdersError::PaymentAlreadyRecorded)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn payment_amount_must_be_positive() -> TestResult {
        let ctx = TestContext::new().await?;
        let item = ctx.seed_item("10.00", 5).await?;

        let cart = ctx.orders.add_to_cart(ctx.customer_uuid, item, 1).await?;

        let result = ctx
            .orders
            .record_payment(cart.uuid, PaymentKind::Card, Decimal::ZERO)
            .await;

        assert!(matches!(result, Err(OrdersError::InvalidArgument(_))));

        Ok(())
    }

    #[tokio::test]
    async fn order_view_serializes_wire_contract() -> TestResult {
        let ctx = TestContext::new().await?;
        let item = ctx.seed_item("10.00", 5).await?;

        let cart = ctx.orders.add_to_cart(ctx.customer_uuid, item, 2).await?;
        ctx.orders.place_order(cart.uuid).await?;
        ctx.orders
            .transition(cart.uuid, OrderStatus::Confirmed)
            .await?;

        let view = ctx.orders.order_detail(cart.uuid).await?;
        let json = serde_json::to_value(&view)?;

        assert_eq!(json["status"], "Confirmed");
        assert_eq!(json["total_price"], "20.00");

        let confirmed_at = json["confirmed_at"].as_str().unwrap().to_string();

        assert_eq!(confirmed_at.len(), "2026-01-01T00:00:00".len());
        assert!(!confirmed_at.ends_with('Z'), "got {confirmed_at}");

        // Timestamps never set are omitted, not null.
        assert!(json.get("cancelled_at").is_none());

        Ok(())
    }
}
