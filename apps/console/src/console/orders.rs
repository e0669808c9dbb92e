//! Order screens: create, by date, and the user's own orders.

use std::collections::HashMap;

use tracing::info;

use super::Console;
use crate::io::{InputSource, OutputSink};
use greenhouse_core::validation::validate_quantity;
use greenhouse_core::{Capability, Composition, Customer, NewOrder, Order, OrderSummary};
use greenhouse_db::DbResult;

impl<I: InputSource, O: OutputSink> Console<I, O> {
    /// Collects customer, composition, dates and quantity, then places the order.
    ///
    /// Pricing is derived by the store; the resulting summary is shown
    /// after a successful insert.
    pub(super) async fn create_order(&mut self) -> Option<()> {
        self.header("CREATE ORDER");
        if !self.allowed(Capability::CreateOrder, "You don't have permission to create orders.") {
            return self.wait_for_key();
        }

        let customers: DbResult<Vec<Customer>> =
            async { self.db.customers()?.list_customers().await }.await;
        match customers {
            Ok(customers) => {
                self.say("Available Customers:");
                self.say(format!("{:<5}{:<20}", "ID", "Name"));
                self.say("-".repeat(25));
                for customer in &customers {
                    self.say(format!("{:<5}{:<20}", customer.id, customer.name));
                }
            }
            Err(e) => {
                self.report_failure("Failed to load customers", &e);
                return self.wait_for_key();
            }
        }

        let customer_id = self.prompt_int("\nEnter Customer ID: ")?;

        let compositions: DbResult<Vec<Composition>> =
            async { self.db.catalog()?.list_compositions().await }.await;
        match compositions {
            Ok(compositions) => {
                self.say("");
                self.say("Available Compositions:");
                self.say(format!("{:<5}{:<25}", "ID", "Name"));
                self.say("-".repeat(30));
                for comp in &compositions {
                    self.say(format!("{:<5}{:<25}", comp.id, comp.name));
                }
            }
            Err(e) => {
                self.report_failure("Failed to load compositions", &e);
                return self.wait_for_key();
            }
        }

        let composition_id = self.prompt_int("\nEnter Composition ID: ")?;
        let order_date = self.prompt_date("Enter Order Date (YYYY-MM-DD): ", "order_date")?;
        let fulfillment_date =
            self.prompt_date("Enter Fulfillment Date (YYYY-MM-DD): ", "fulfillment_date")?;
        let quantity = self.prompt_int("Enter Quantity: ")?;

        if let Err(e) = validate_quantity(quantity) {
            self.say(format!("Failed to create order: {}", e));
            return self.wait_for_key();
        }

        let order = NewOrder {
            customer_id,
            composition_id,
            order_date,
            fulfillment_date,
            quantity,
        };

        let created: DbResult<(i64, Option<Order>, Option<OrderSummary>)> = async {
            let orders = self.db.orders()?;
            let id = orders.create_order(&order).await?;
            let stored = orders.get_order_by_id(id).await?;
            let summary = orders.get_order_summary(id).await?;
            Ok((id, stored, summary))
        }
        .await;

        match created {
            Ok((id, stored, summary)) => {
                info!(
                    order_id = id,
                    customer_id,
                    composition_id,
                    user = ?self.session.current_user(),
                    "Order placed from console"
                );
                self.say("Order created successfully!");
                self.say(format!("Order #{}", id));
                if let Some(stored) = stored {
                    self.say(format!("Urgency:     {}", stored.urgency_rate));
                }
                if let Some(summary) = summary {
                    let base = self.money(summary.base_price);
                    let fee = self.money(summary.urgency_fee);
                    let total = self.money(summary.total_price);
                    self.say(format!("Base price:  {}", base));
                    self.say(format!("Urgency fee: {}", fee));
                    self.say(format!("Total:       {}", total));
                }
            }
            Err(e) => self.report_failure("Failed to create order", &e),
        }
        self.wait_for_key()
    }

    pub(super) async fn show_orders_by_date(&mut self) -> Option<()> {
        self.header("ORDERS BY DATE");
        if !self.allowed(Capability::ViewOrders, "You don't have permission to view orders.") {
            return self.wait_for_key();
        }

        let date = self.prompt_date("Enter Date (YYYY-MM-DD): ", "date")?;

        let result: DbResult<(Vec<Order>, HashMap<i64, String>, HashMap<i64, String>)> = async {
            let orders = self.db.orders()?.get_orders_by_date(&date).await?;
            let customers = self
                .db
                .customers()?
                .list_customers()
                .await?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();
            let compositions = self
                .db
                .catalog()?
                .list_compositions()
                .await?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();
            Ok((orders, customers, compositions))
        }
        .await;

        match result {
            Ok((orders, _, _)) if orders.is_empty() => {
                self.say("No orders found for the specified date.");
            }
            Ok((orders, customers, compositions)) => {
                self.say(format!(
                    "{:<5}{:<20}{:<20}{:<12}{:<15}{:<10}{:<10}",
                    "ID", "Customer", "Composition", "Order Date", "Delivery Date", "Quantity", "Urgency %"
                ));
                self.say("-".repeat(92));
                for order in &orders {
                    let customer = customers
                        .get(&order.customer_id)
                        .map(String::as_str)
                        .unwrap_or("Unknown");
                    let composition = compositions
                        .get(&order.composition_id)
                        .map(String::as_str)
                        .unwrap_or("Unknown");
                    self.say(format!(
                        "{:<5}{:<20}{:<20}{:<12}{:<15}{:<10}{:<10}",
                        order.id,
                        customer,
                        composition,
                        order.order_date,
                        order.fulfillment_date,
                        order.quantity,
                        order.urgency_rate.to_string()
                    ));
                }
            }
            Err(e) => self.report_failure("Failed to load orders", &e),
        }
        self.wait_for_key()
    }

    /// Orders of the customer whose name matches the logged-in username.
    pub(super) async fn show_my_orders(&mut self) -> Option<()> {
        self.header("MY ORDERS");
        if !self.allowed(
            Capability::ViewOwnOrders,
            "You don't have permission to view your orders.",
        ) {
            return self.wait_for_key();
        }

        let username = self.session.current_user().unwrap_or_default().to_string();

        type Rows = Vec<(Order, String, Option<OrderSummary>)>;
        let result: DbResult<Option<Rows>> = async {
            let Some(customer) = self.db.customers()?.get_customer_by_name(&username).await? else {
                return Ok(None);
            };
            let repo = self.db.orders()?;
            let names: HashMap<i64, String> = self
                .db
                .catalog()?
                .list_compositions()
                .await?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();

            let mut rows = Vec::new();
            for order in repo.get_orders_by_customer(customer.id).await? {
                let summary = repo.get_order_summary(order.id).await?;
                let name = names
                    .get(&order.composition_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string());
                rows.push((order, name, summary));
            }
            Ok(Some(rows))
        }
        .await;

        match result {
            Ok(None) => self.say("No customer record matches your username."),
            Ok(Some(rows)) if rows.is_empty() => self.say("You have no orders yet."),
            Ok(Some(rows)) => {
                self.say(format!(
                    "{:<5}{:<20}{:<12}{:<15}{:<10}{:<10}{:<10}",
                    "ID", "Composition", "Order Date", "Delivery Date", "Quantity", "Urgency", "Total"
                ));
                self.say("-".repeat(82));
                for (order, composition, summary) in &rows {
                    let total = summary
                        .as_ref()
                        .map(|s| self.money(s.total_price))
                        .unwrap_or_else(|| "-".to_string());
                    self.say(format!(
                        "{:<5}{:<20}{:<12}{:<15}{:<10}{:<10}{:<10}",
                        order.id,
                        composition,
                        order.order_date,
                        order.fulfillment_date,
                        order.quantity,
                        order.urgency_rate.to_string(),
                        total
                    ));
                }
            }
            Err(e) => self.report_failure("Failed to load your orders", &e),
        }
        self.wait_for_key()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use crate::console::Console;
    use crate::io::{BufferOutput, ScriptedInput};
    use greenhouse_core::UserDirectory;
    use greenhouse_db::{seed_demo_data, Database, DbConfig};

    async fn run_script(script: &[&str]) -> Console<ScriptedInput, BufferOutput> {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        seed_demo_data(&db).await.unwrap();
        let mut console = Console::new(
            db,
            UserDirectory::with_default_users().unwrap(),
            AppConfig::default(),
            ScriptedInput::new(script.iter().copied()),
            BufferOutput::new(),
        );
        console.run().await.unwrap();
        console
    }

    async fn order_count(console: &Console<ScriptedInput, BufferOutput>) -> i64 {
        console.database().orders().unwrap().count().await.unwrap()
    }

    #[tokio::test]
    async fn test_user_creates_order_and_sees_it() {
        // Customer 5 is the demo "user"; same-day delivery carries the 25% tier
        let console = run_script(&[
            "1", "user", "user123",
            "3", "5", "1", "2025-05-01", "2025-05-01", "2", "",
            "4", "",
            "0",
        ])
        .await;
        let out = console.output();
        assert!(out.contains("Available Customers:"));
        assert!(out.contains("Order created successfully!"));
        assert!(out.contains("Urgency:     25%"));
        assert!(out.contains("MY ORDERS"));
        assert!(out.contains("2025-05-01"));
        assert_eq!(order_count(&console).await, 13);
    }

    #[tokio::test]
    async fn test_order_with_unknown_customer_fails() {
        let console = run_script(&[
            "1", "admin", "admin123",
            "5", "404", "1", "2025-05-01", "2025-05-03", "1", "",
            "0",
        ])
        .await;
        let out = console.output();
        assert!(out.contains("Failed to create order: Invalid reference."));
        assert_eq!(order_count(&console).await, 12);
    }

    #[tokio::test]
    async fn test_order_quantity_must_be_positive() {
        let console = run_script(&[
            "1", "admin", "admin123",
            "5", "1", "1", "2025-05-01", "2025-05-03", "0", "",
            "0",
        ])
        .await;
        assert!(console.output().contains("Failed to create order:"));
        assert!(!console.output().contains("Order created successfully!"));
        assert_eq!(order_count(&console).await, 12);
    }

    #[tokio::test]
    async fn test_malformed_date_gets_hint_but_is_kept() {
        let console = run_script(&[
            "1", "admin", "admin123",
            "5", "1", "1", "01/05/2025", "2025-05-03", "1", "",
            "0",
        ])
        .await;
        let out = console.output();
        assert!(out.contains("Note:"));
        assert!(out.contains("Order created successfully!"));
        // Unparseable dates carry no urgency
        assert!(out.contains("Urgency:     0%"));
    }

    #[tokio::test]
    async fn test_orders_by_date() {
        let console = run_script(&[
            "1", "admin", "admin123",
            "6", "2025-04-10", "",
            "6", "1999-01-01", "",
            "0",
        ])
        .await;
        let out = console.output();
        assert!(out.contains("Delivery Date"));
        assert!(out.contains("Spring Morning"));
        assert!(out.contains("Olena Shevchenko"));
        assert!(out.contains("No orders found for the specified date."));
    }

    #[tokio::test]
    async fn test_my_orders_lists_seeded_orders() {
        let console = run_script(&["1", "user", "user123", "4", "", "0"]).await;
        let out = console.output();
        // Seeded orders for "user" are dated 2025-04-07 and 2025-04-21
        assert!(out.contains("2025-04-07"));
        assert!(out.contains("2025-04-21"));
        assert!(!out.contains("You have no orders yet."));
    }

    #[tokio::test]
    async fn test_my_orders_without_customer_record() {
        let console = run_script(&[
            "2", "tulip", "secret1", "user", "",
            "1", "tulip", "secret1",
            "4", "",
            "0",
        ])
        .await;
        assert!(console
            .output()
            .contains("No customer record matches your username."));
    }
}
