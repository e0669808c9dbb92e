//! Flower and composition screens.

use tracing::{debug, info};

use super::Console;
use crate::io::{InputSource, OutputSink};
use greenhouse_core::{Capability, Composition, CompositionLine, Flower};
use greenhouse_db::DbResult;

impl<I: InputSource, O: OutputSink> Console<I, O> {
    pub(super) async fn show_all_flowers(&mut self) -> Option<()> {
        self.header("ALL FLOWERS");
        if self.allowed(Capability::ViewFlowers, "You don't have permission to view flowers.") {
            self.print_flower_table().await;
        }
        self.wait_for_key()
    }

    /// Lists flowers, then applies a new price to the chosen one.
    ///
    /// The store enforces the increase cap; a rejected change leaves the
    /// price untouched and its reason is shown.
    pub(super) async fn update_flower_price(&mut self) -> Option<()> {
        self.header("UPDATE FLOWER PRICE");
        if !self.allowed(
            Capability::UpdateFlowerPrice,
            "You don't have permission to update flower prices.",
        ) {
            return self.wait_for_key();
        }

        self.print_flower_table().await;

        let flower_id = self.prompt_int("\nEnter Flower ID to update: ")?;
        let price = self.prompt_money("Enter new price: ")?;

        let result: DbResult<()> =
            async { self.db.catalog()?.update_flower_price(flower_id, price).await }.await;

        match result {
            Ok(()) => {
                info!(
                    flower_id,
                    price = %price,
                    user = ?self.session.current_user(),
                    "Flower price changed from console"
                );
                self.say("Price updated successfully!");
            }
            Err(e) => self.report_failure("Failed to update price", &e),
        }
        self.wait_for_key()
    }

    pub(super) async fn show_all_compositions(&mut self) -> Option<()> {
        self.header("ALL COMPOSITIONS");
        if !self.allowed(
            Capability::ViewCompositions,
            "You don't have permission to view compositions.",
        ) {
            return self.wait_for_key();
        }

        let result: DbResult<Vec<Composition>> =
            async { self.db.catalog()?.list_compositions().await }.await;

        match result {
            Ok(compositions) if compositions.is_empty() => {
                self.say("No compositions found in the database.");
            }
            Ok(compositions) => {
                self.say(format!("{:<5}{:<25}{:<40}", "ID", "Name", "Description"));
                self.say("-".repeat(70));
                for comp in &compositions {
                    self.say(format!(
                        "{:<5}{:<25}{:<40}",
                        comp.id, comp.name, comp.description
                    ));
                }
            }
            Err(e) => self.report_failure("Failed to load compositions", &e),
        }
        self.wait_for_key()
    }

    /// Shows one composition with its flower breakdown.
    pub(super) async fn show_composition_details(&mut self, composition_id: i64) -> Option<()> {
        self.header("COMPOSITION DETAILS");
        if !self.allowed(
            Capability::ViewCompositions,
            "You don't have permission to view compositions.",
        ) {
            return self.wait_for_key();
        }

        let result: DbResult<Option<(Composition, Vec<CompositionLine>)>> = async {
            let catalog = self.db.catalog()?;
            match catalog.get_composition_by_id(composition_id).await? {
                Some(comp) => {
                    let lines = catalog.get_composition_breakdown(composition_id).await?;
                    Ok(Some((comp, lines)))
                }
                None => Ok(None),
            }
        }
        .await;

        match result {
            Ok(None) => self.say("Composition not found."),
            Ok(Some((comp, lines))) => {
                self.say(format!("ID: {}", comp.id));
                self.say(format!("Name: {}", comp.name));
                self.say(format!("Description: {}", comp.description));
                self.say("");
                self.say("Flowers in this composition:");
                self.say(format!("{:<20}{:<20}{:<10}", "Flower", "Variety", "Quantity"));
                self.say("-".repeat(50));
                for line in &lines {
                    self.say(format!(
                        "{:<20}{:<20}{:<10}",
                        line.flower_name, line.variety, line.quantity
                    ));
                }
                let stems: i64 = lines.iter().map(|line| line.quantity).sum();
                self.say("-".repeat(50));
                self.say(format!("{:<40}{:<10}", "Total stems", stems));
            }
            Err(e) => self.report_failure("Failed to load composition", &e),
        }
        self.wait_for_key()
    }

    pub(super) async fn show_most_popular_composition(&mut self) -> Option<()> {
        self.header("MOST POPULAR COMPOSITION");
        if !self.allowed(
            Capability::ViewCompositions,
            "You don't have permission to view compositions.",
        ) {
            return self.wait_for_key();
        }

        let result: DbResult<Option<Composition>> =
            async { self.db.catalog()?.get_most_popular_composition().await }.await;

        match result {
            Ok(None) => self.say("No compositions or orders found in the database."),
            Ok(Some(comp)) => {
                self.say(format!("ID: {}", comp.id));
                self.say(format!("Name: {}", comp.name));
                self.say(format!("Description: {}", comp.description));
            }
            Err(e) => self.report_failure("Failed to load most popular composition", &e),
        }
        self.wait_for_key()
    }

    /// Composition submenu of the user menu.
    pub(super) async fn composition_menu(&mut self) -> Option<()> {
        loop {
            self.header("COMPOSITION MANAGEMENT");
            self.say("1. View All Compositions");
            self.say("2. View Composition Details");
            self.say("3. View Most Popular Composition");
            self.say("4. Back to Main Menu");
            self.say("");

            match self.prompt_int("Enter your choice: ")? {
                1 => self.show_all_compositions().await?,
                2 => {
                    let id = self.prompt_int("Enter Composition ID: ")?;
                    self.show_composition_details(id).await?
                }
                3 => self.show_most_popular_composition().await?,
                4 => return Some(()),
                _ => self.invalid_choice()?,
            }
        }
    }

    /// Prints the flower table used by the list and price screens.
    async fn print_flower_table(&mut self) {
        let result: DbResult<Vec<Flower>> =
            async { self.db.catalog()?.list_flowers().await }.await;

        match result {
            Ok(flowers) if flowers.is_empty() => self.say("No flowers found in the database."),
            Ok(flowers) => {
                debug!(count = flowers.len(), "Showing flowers");
                self.say(format!(
                    "{:<5}{:<20}{:<20}{:<10}",
                    "ID", "Name", "Variety", "Price"
                ));
                self.say("-".repeat(55));
                for flower in &flowers {
                    let price = self.money(flower.price);
                    self.say(format!(
                        "{:<5}{:<20}{:<20}{:<10}",
                        flower.id, flower.name, flower.variety, price
                    ));
                }
            }
            Err(e) => self.report_failure("Failed to load flowers", &e),
        }
    }
}
