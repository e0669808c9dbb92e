//! # Console Menus
//!
//! The interactive front end: start screen, role menus and the screens
//! behind them.
//!
//! ## Navigation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Start Screen                                    │
//! │                 1. Login   2. Register   0. Exit                        │
//! │                        │                                                │
//! │            ┌───────────┴─────────────┐                                  │
//! │            ▼                         ▼                                  │
//! │  ┌───────────────────────┐   ┌──────────────────────────────┐          │
//! │  │      ADMIN MENU       │   │          USER MENU           │          │
//! │  │  flowers, price,      │   │  flowers                     │          │
//! │  │  compositions,        │   │  compositions ──► submenu    │          │
//! │  │  most popular,        │   │  create order                │          │
//! │  │  create order,        │   │  my orders                   │          │
//! │  │  orders by date,      │   │                              │          │
//! │  │  four reports         │   │                              │          │
//! │  └──────────┬────────────┘   └──────────────┬───────────────┘          │
//! │             │ Logout                        │ Logout                   │
//! │             └───────────► Start Screen ◄────┘                          │
//! │                                                                         │
//! │  0. Exit anywhere, or end of input ──► "Goodbye!"                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Screen Contract
//! Every screen returns `Option<()>`: `None` means input ran out and the
//! console must stop. Each screen checks the session's capability before
//! touching the store, and turns store errors into a message.

mod catalog;
mod orders;
mod reports;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::{user_message, ConsoleResult};
use crate::io::{InputSource, OutputSink};
use greenhouse_core::validation::{validate_date_text, validate_password, validate_username};
use greenhouse_core::{Capability, CoreError, Money, Role, Session, UserDirectory};
use greenhouse_db::{Database, DbError};

const BANNER: &str = "====================================";

/// Where a role menu hands control back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Back to the start screen
    Logout,
    /// Leave the program
    Exit,
}

/// The interactive console.
///
/// Generic over its input and output so tests can script a whole session.
pub struct Console<I: InputSource, O: OutputSink> {
    db: Database,
    users: UserDirectory,
    session: Session,
    config: AppConfig,
    input: I,
    output: O,
}

impl<I: InputSource, O: OutputSink> Console<I, O> {
    pub fn new(db: Database, users: UserDirectory, config: AppConfig, input: I, output: O) -> Self {
        Console {
            db,
            users,
            session: Session::new(),
            config,
            input,
            output,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Closes the store connection.
    pub async fn shutdown(&mut self) {
        self.session.logout();
        self.db.disconnect().await;
    }

    /// Runs the console until the user exits or input ends.
    ///
    /// ## Returns
    /// * `Ok(())` - User chose Exit, or input ended
    /// * `Err(ConsoleError::Database)` - The store could not be opened
    pub async fn run(&mut self) -> ConsoleResult<()> {
        if !self.db.is_connected() {
            if let Err(e) = self.db.connect().await {
                self.say("Failed to connect to the database. Exiting...");
                return Err(e.into());
            }
        }

        loop {
            self.header("FLOWER GREENHOUSE MANAGEMENT");
            self.say("1. Login");
            self.say("2. Register");
            self.say("0. Exit");
            self.say("");

            let Some(choice) = self.prompt_int("Enter your choice: ") else {
                break;
            };

            let step = match choice {
                1 => match self.login_screen() {
                    None => None,
                    Some(()) if self.session.is_authenticated() => match self.role_menu().await {
                        Flow::Logout => Some(()),
                        Flow::Exit => None,
                    },
                    Some(()) => Some(()),
                },
                2 => self.register_screen(),
                0 => None,
                _ => self.invalid_choice(),
            };

            if step.is_none() {
                break;
            }
        }

        self.say("Goodbye!");
        info!("Console closed");
        Ok(())
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    fn login_screen(&mut self) -> Option<()> {
        self.header("LOGIN");

        let username = self.prompt("Username: ")?;
        let password = self.prompt("Password: ")?;

        match self.session.login(&self.users, username.trim(), &password) {
            Ok(()) => {
                info!(user = %username.trim(), "User logged in");
                self.say("Login successful!");
                Some(())
            }
            Err(e) => {
                warn!(user = %username.trim(), error = %e, "Login failed");
                self.say("Invalid username or password.");
                self.wait_for_key()
            }
        }
    }

    fn register_screen(&mut self) -> Option<()> {
        self.header("REGISTRATION");

        let username = self.prompt("Choose a username: ")?;
        let password = self.prompt("Choose a password: ")?;
        let role_text = self.prompt("Role (user/admin): ")?;
        let username = username.trim();

        let checked = validate_username(username)
            .and_then(|_| validate_password(&password))
            .map_err(CoreError::from)
            .and_then(|_| role_text.trim().parse::<Role>());

        let outcome = checked
            .and_then(|role| self.users.register(username, &password, role).map(|_| role));

        match outcome {
            Ok(role) => {
                info!(user = %username, %role, "User registered");
                self.say("Registration successful!");
            }
            Err(e) => {
                self.say(format!("Registration failed: {}", e));
            }
        }
        self.wait_for_key()
    }

    fn logout(&mut self) {
        if let Some(user) = self.session.current_user() {
            info!(user = %user, "User logged out");
        }
        self.session.logout();
    }

    // =========================================================================
    // Role Menus
    // =========================================================================

    async fn role_menu(&mut self) -> Flow {
        match self.session.current_role() {
            Some(Role::Admin) => self.admin_menu().await,
            Some(Role::User) => self.user_menu().await,
            None => Flow::Logout,
        }
    }

    async fn admin_menu(&mut self) -> Flow {
        loop {
            self.header("ADMIN MENU");
            let user = self.session.current_user().unwrap_or_default().to_string();
            self.say(format!("Logged in as: {} (Administrator)", user));
            self.say("");
            self.say("1. View All Flowers");
            self.say("2. Update Flower Price");
            self.say("3. View All Compositions");
            self.say("4. View Most Popular Composition");
            self.say("5. Create New Order");
            self.say("6. View Orders by Date");
            self.say("7. View Total Revenue Report");
            self.say("8. View Orders by Urgency Report");
            self.say("9. View Flower Usage Report");
            self.say("10. View Composition Sales Report");
            self.say("11. Logout");
            self.say("0. Exit");
            self.say("");

            let Some(choice) = self.prompt_int("Enter your choice: ") else {
                return Flow::Exit;
            };

            let step = match choice {
                1 => self.show_all_flowers().await,
                2 => self.update_flower_price().await,
                3 => self.show_all_compositions().await,
                4 => self.show_most_popular_composition().await,
                5 => self.create_order().await,
                6 => self.show_orders_by_date().await,
                7 => self.show_revenue_report().await,
                8 => self.show_urgency_report().await,
                9 => self.show_flower_usage_report().await,
                10 => self.show_composition_sales_report().await,
                11 => {
                    self.logout();
                    return Flow::Logout;
                }
                0 => return Flow::Exit,
                _ => self.invalid_choice(),
            };

            if step.is_none() {
                return Flow::Exit;
            }
        }
    }

    async fn user_menu(&mut self) -> Flow {
        loop {
            self.header("USER MENU");
            let user = self.session.current_user().unwrap_or_default().to_string();
            self.say(format!("Logged in as: {}", user));
            self.say("");
            self.say("1. View All Flowers");
            self.say("2. View All Compositions");
            self.say("3. Create New Order");
            self.say("4. View My Orders");
            self.say("5. Logout");
            self.say("0. Exit");
            self.say("");

            let Some(choice) = self.prompt_int("Enter your choice: ") else {
                return Flow::Exit;
            };

            let step = match choice {
                1 => self.show_all_flowers().await,
                2 => self.composition_menu().await,
                3 => self.create_order().await,
                4 => self.show_my_orders().await,
                5 => {
                    self.logout();
                    return Flow::Logout;
                }
                0 => return Flow::Exit,
                _ => self.invalid_choice(),
            };

            if step.is_none() {
                return Flow::Exit;
            }
        }
    }

    // =========================================================================
    // Output Helpers
    // =========================================================================

    fn say(&mut self, line: impl AsRef<str>) {
        self.output.write_line(line.as_ref());
    }

    /// Clears the screen and prints a banner with a centered title.
    fn header(&mut self, title: &str) {
        self.output.clear();
        self.say(BANNER);
        self.say(format!("{:^36}", title));
        self.say(BANNER);
        self.say("");
    }

    fn money(&self, amount: Money) -> String {
        self.config.format_money(amount)
    }

    /// Prints `denied` and returns false unless the session holds `capability`.
    fn allowed(&mut self, capability: Capability, denied: &str) -> bool {
        if self.session.has_capability(capability) {
            true
        } else {
            warn!(
                user = ?self.session.current_user(),
                capability = capability.as_str(),
                "Permission denied"
            );
            self.say(denied);
            false
        }
    }

    /// Prints a store failure with some context.
    fn report_failure(&mut self, action: &str, err: &DbError) {
        let message = user_message(err);
        self.say(format!("{}: {}", action, message));
    }

    fn invalid_choice(&mut self) -> Option<()> {
        self.say("Invalid choice. Please try again.");
        self.wait_for_key()
    }

    // =========================================================================
    // Input Helpers
    // =========================================================================

    fn prompt(&mut self, prompt: &str) -> Option<String> {
        self.input.read_line(prompt)
    }

    /// Reads a whole number, asking again until one is entered.
    fn prompt_int(&mut self, prompt: &str) -> Option<i64> {
        loop {
            let line = self.prompt(prompt)?;
            match line.trim().parse::<i64>() {
                Ok(value) => return Some(value),
                Err(_) => self.say("Invalid input. Please enter a number."),
            }
        }
    }

    /// Reads an amount like `12.50`, asking again until one parses.
    fn prompt_money(&mut self, prompt: &str) -> Option<Money> {
        loop {
            let line = self.prompt(prompt)?;
            match line.parse::<Money>() {
                Ok(amount) => return Some(amount),
                Err(e) => self.say(format!("Invalid input: {}", e)),
            }
        }
    }

    /// Reads a date. Text that is not `YYYY-MM-DD` gets a hint but is
    /// passed on unchanged.
    fn prompt_date(&mut self, prompt: &str, field: &str) -> Option<String> {
        let text = self.prompt(prompt)?.trim().to_string();
        if let Err(e) = validate_date_text(field, &text) {
            self.say(format!("Note: {}", e));
        }
        Some(text)
    }

    fn wait_for_key(&mut self) -> Option<()> {
        self.prompt("\nPress Enter to continue...").map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{BufferOutput, ScriptedInput};
    use greenhouse_db::{seed_demo_data, DbConfig};

    type TestConsole = Console<ScriptedInput, BufferOutput>;

    async fn seeded_console(script: &[&str]) -> TestConsole {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        seed_demo_data(&db).await.unwrap();
        let users = UserDirectory::with_default_users().unwrap();
        Console::new(
            db,
            users,
            AppConfig::default(),
            ScriptedInput::new(script.iter().copied()),
            BufferOutput::new(),
        )
    }

    async fn run_script(script: &[&str]) -> TestConsole {
        let mut console = seeded_console(script).await;
        console.run().await.unwrap();
        console
    }

    #[tokio::test]
    async fn test_exit_from_start_screen() {
        let console = run_script(&["0"]).await;
        let out = console.output();
        assert!(out.contains("FLOWER GREENHOUSE MANAGEMENT"));
        assert_eq!(out.lines().last().map(String::as_str), Some("Goodbye!"));
    }

    #[tokio::test]
    async fn test_end_of_input_exits_cleanly() {
        let console = run_script(&[]).await;
        assert!(console.output().contains("Goodbye!"));
        assert!(!console.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_invalid_number_reprompts() {
        let console = run_script(&["abc", "", "0"]).await;
        let out = console.output();
        assert_eq!(
            out.lines()
                .iter()
                .filter(|l| l.as_str() == "Invalid input. Please enter a number.")
                .count(),
            2
        );
        assert!(out.contains("Goodbye!"));
        // Same prompt shown three times, no menu redraw in between
        assert_eq!(console.input().prompts().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_choice_is_reported() {
        let console = run_script(&["7", "", "0"]).await;
        assert!(console.output().contains("Invalid choice. Please try again."));
    }

    #[tokio::test]
    async fn test_failed_login_stays_logged_out() {
        let console = run_script(&["1", "admin", "wrong", "", "0"]).await;
        let out = console.output();
        assert!(out.contains("Invalid username or password."));
        assert!(!out.contains("ADMIN MENU"));
        assert!(!console.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_admin_login_and_logout() {
        let console = run_script(&["1", "admin", "admin123", "11", "0"]).await;
        let out = console.output();
        assert!(out.contains("Login successful!"));
        assert!(out.contains("Logged in as: admin (Administrator)"));
        assert!(out.contains("11. Logout"));
        assert!(!console.session().is_authenticated());
        assert!(out.contains("Goodbye!"));
    }

    #[tokio::test]
    async fn test_user_gets_user_menu() {
        let console = run_script(&["1", "user", "user123", "0"]).await;
        let out = console.output();
        assert!(out.contains("USER MENU"));
        assert!(out.contains("4. View My Orders"));
        assert!(!out.contains("ADMIN MENU"));
    }

    #[tokio::test]
    async fn test_exit_from_menu_keeps_session_until_shutdown() {
        let mut console = run_script(&["1", "user", "user123", "0"]).await;
        assert_eq!(console.session().current_user(), Some("user"));

        console.shutdown().await;
        assert!(!console.session().is_authenticated());
        assert!(!console.database().is_connected());
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let console = run_script(&[
            "2", "fern", "secret1", "user", "", // register
            "1", "fern", "secret1", // login
            "5", // logout
            "0",
        ])
        .await;
        let out = console.output();
        assert!(out.contains("Registration successful!"));
        assert!(out.contains("Logged in as: fern"));
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_role() {
        let console = run_script(&["2", "fern", "secret1", "boss", "", "0"]).await;
        assert!(console
            .output()
            .contains("Registration failed: Unknown role: boss"));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_user() {
        let console = run_script(&["2", "admin", "another1", "admin", "", "0"]).await;
        assert!(console.output().contains("Registration failed"));
        assert!(!console.output().contains("Registration successful!"));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let console = run_script(&["2", "fern", "abc", "user", "", "0"]).await;
        assert!(console.output().contains("Registration failed"));
    }

    #[tokio::test]
    async fn test_run_fails_when_store_cannot_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("greenhouse.db");
        let db = Database::new(DbConfig::new(path));
        let users = UserDirectory::new();
        let mut console = Console::new(
            db,
            users,
            AppConfig::default(),
            ScriptedInput::new(["0"]),
            BufferOutput::new(),
        );

        assert!(console.run().await.is_err());
        assert!(console
            .output()
            .contains("Failed to connect to the database. Exiting..."));
    }

    #[tokio::test]
    async fn test_screens_refuse_without_capability() {
        let mut console = seeded_console(&["", "", "", "", "", ""]).await;

        // Logged out: nothing is granted
        console.show_all_flowers().await.unwrap();
        assert!(console.output().contains("You don't have permission to view flowers."));

        console.session.login(&console.users, "user", "user123").unwrap();
        console.update_flower_price().await.unwrap();
        console.show_orders_by_date().await.unwrap();
        console.show_revenue_report().await.unwrap();

        let out = console.output();
        assert!(out.contains("You don't have permission to update flower prices."));
        assert!(out.contains("You don't have permission to view orders."));
        assert!(out.contains("You don't have permission to view reports."));

        console.session.login(&console.users, "admin", "admin123").unwrap();
        console.show_my_orders().await.unwrap();
        assert!(console
            .output()
            .contains("You don't have permission to view your orders."));
    }
}
