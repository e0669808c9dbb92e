//! Report screens. All of them require the `view_reports` capability.

use std::collections::BTreeMap;

use super::Console;
use crate::io::{InputSource, OutputSink};
use greenhouse_core::{Capability, CompositionSales, Money, UrgencyBucket};
use greenhouse_db::DbResult;

const DENIED: &str = "You don't have permission to view reports.";

impl<I: InputSource, O: OutputSink> Console<I, O> {
    pub(super) async fn show_revenue_report(&mut self) -> Option<()> {
        self.header("REVENUE REPORT");
        if !self.allowed(Capability::ViewReports, DENIED) {
            return self.wait_for_key();
        }

        let start = self.prompt_date("Enter Start Date (YYYY-MM-DD): ", "start_date")?;
        let end = self.prompt_date("Enter End Date (YYYY-MM-DD): ", "end_date")?;

        let result: DbResult<Money> =
            async { self.db.orders()?.get_total_revenue(&start, &end).await }.await;

        match result {
            Ok(total) => {
                let total = self.money(total);
                self.say("");
                self.say(format!(
                    "Total Revenue for period {} to {}: {}",
                    start, end, total
                ));
            }
            Err(e) => self.report_failure("Failed to compute revenue", &e),
        }
        self.wait_for_key()
    }

    pub(super) async fn show_urgency_report(&mut self) -> Option<()> {
        self.header("URGENCY STATISTICS");
        if !self.allowed(Capability::ViewReports, DENIED) {
            return self.wait_for_key();
        }

        let result: DbResult<Vec<UrgencyBucket>> =
            async { self.db.orders()?.get_orders_by_urgency().await }.await;

        match result {
            Ok(buckets) if buckets.is_empty() => self.say("No order statistics available."),
            Ok(buckets) => {
                self.say(format!("{:<15}{:<15}", "Urgency Rate", "Order Count"));
                self.say("-".repeat(30));
                for bucket in &buckets {
                    self.say(format!(
                        "{:<15}{:<15}",
                        format!("{}%", bucket.percent),
                        bucket.order_count
                    ));
                }
            }
            Err(e) => self.report_failure("Failed to load urgency statistics", &e),
        }
        self.wait_for_key()
    }

    pub(super) async fn show_flower_usage_report(&mut self) -> Option<()> {
        self.header("FLOWER USAGE REPORT");
        if !self.allowed(Capability::ViewReports, DENIED) {
            return self.wait_for_key();
        }

        let start = self.prompt_date("Enter Start Date (YYYY-MM-DD): ", "start_date")?;
        let end = self.prompt_date("Enter End Date (YYYY-MM-DD): ", "end_date")?;

        let result: DbResult<BTreeMap<String, BTreeMap<String, i64>>> =
            async { self.db.orders()?.get_flower_usage_by_period(&start, &end).await }.await;

        match result {
            Ok(usage) if usage.is_empty() => {
                self.say("No flower usage data for the specified period.");
            }
            Ok(usage) => {
                self.say(format!("{:<20}{:<20}{:<10}", "Flower", "Variety", "Quantity"));
                self.say("-".repeat(50));
                for (flower, varieties) in &usage {
                    for (variety, stems) in varieties {
                        self.say(format!("{:<20}{:<20}{:<10}", flower, variety, stems));
                    }
                }
            }
            Err(e) => self.report_failure("Failed to load flower usage", &e),
        }
        self.wait_for_key()
    }

    pub(super) async fn show_composition_sales_report(&mut self) -> Option<()> {
        self.header("COMPOSITION SALES REPORT");
        if !self.allowed(Capability::ViewReports, DENIED) {
            return self.wait_for_key();
        }

        let result: DbResult<BTreeMap<String, CompositionSales>> =
            async { self.db.orders()?.get_composition_sales_summary().await }.await;

        match result {
            Ok(sales) if sales.is_empty() => self.say("No composition sales data available."),
            Ok(sales) => {
                self.say(format!("{:<25}{:<15}{:<15}", "Composition", "Orders", "Revenue"));
                self.say("-".repeat(55));
                for (composition, data) in &sales {
                    let revenue = self.money(data.revenue);
                    self.say(format!(
                        "{:<25}{:<15}{:<15}",
                        composition, data.order_count, revenue
                    ));
                }
            }
            Err(e) => self.report_failure("Failed to load composition sales", &e),
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

    async fn admin_session(seed: bool, script: &[&str]) -> Console<ScriptedInput, BufferOutput> {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        if seed {
            seed_demo_data(&db).await.unwrap();
        }
        let mut lines = vec!["1", "admin", "admin123"];
        lines.extend_from_slice(script);
        lines.push("0");

        let mut console = Console::new(
            db,
            UserDirectory::with_default_users().unwrap(),
            AppConfig::default(),
            ScriptedInput::new(lines),
            BufferOutput::new(),
        );
        console.run().await.unwrap();
        console
    }

    #[tokio::test]
    async fn test_revenue_report_matches_store() {
        let console = admin_session(true, &["7", "2025-04-01", "2025-04-30", ""]).await;

        let expected = console
            .database()
            .orders()
            .unwrap()
            .get_total_revenue("2025-04-01", "2025-04-30")
            .await
            .unwrap();
        let line = format!("Total Revenue for period 2025-04-01 to 2025-04-30: {}", expected);
        assert!(console.output().contains(&line), "missing {:?}", line);
    }

    #[tokio::test]
    async fn test_revenue_report_empty_period_is_zero() {
        let console = admin_session(true, &["7", "1999-01-01", "1999-12-31", ""]).await;
        assert!(console
            .output()
            .contains("Total Revenue for period 1999-01-01 to 1999-12-31: $0.00"));
    }

    #[tokio::test]
    async fn test_urgency_report_lists_every_tier() {
        let console = admin_session(true, &["8", ""]).await;
        let out = console.output();
        assert!(out.contains("Urgency Rate"));
        for tier in ["0%", "10%", "15%", "25%"] {
            assert!(
                out.lines().iter().any(|l| l.starts_with(tier)),
                "missing tier {}",
                tier
            );
        }
    }

    #[tokio::test]
    async fn test_flower_usage_report() {
        let console = admin_session(true, &["9", "2025-04-01", "2025-04-01", ""]).await;
        let out = console.output();
        // The only order that day is one Classic Romance: 12 roses, 5 eucalyptus
        assert!(out
            .lines()
            .iter()
            .any(|l| l.starts_with("Rose") && l.contains("Red Naomi") && l.trim_end().ends_with("12")));
        assert!(out.contains("Eucalyptus"));
        assert!(!out.contains("Tulip"));
    }

    #[tokio::test]
    async fn test_composition_sales_report() {
        let console = admin_session(true, &["10", ""]).await;
        let out = console.output();
        assert!(out.contains("COMPOSITION SALES REPORT"));
        assert!(out.contains("Classic Romance"));
        assert!(out.contains("White Elegance"));
    }

    #[tokio::test]
    async fn test_reports_on_empty_store() {
        let console = admin_session(false, &["8", "", "9", "2025-01-01", "2025-12-31", "", "10", ""]).await;
        let out = console.output();
        assert!(out.contains("No order statistics available."));
        assert!(out.contains("No flower usage data for the specified period."));
        assert!(out.contains("No composition sales data available."));
    }
}
