use anyhow::Result;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use crate::db::Database;
use crate::models::*;

pub(crate) const NEW_USER: &str = "New User";

/// Sidebar menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Menu {
    AddExpense,
    ViewSummary,
}

impl Menu {
    pub(crate) fn all() -> &'static [Menu] {
        &[Self::AddExpense, Self::ViewSummary]
    }

    pub(crate) fn toggle(self) -> Self {
        match self {
            Self::AddExpense => Self::ViewSummary,
            Self::ViewSummary => Self::AddExpense,
        }
    }
}

impl std::fmt::Display for Menu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddExpense => write!(f, "Add Expense"),
            Self::ViewSummary => write!(f, "View Summary"),
        }
    }
}

/// The widget receiving keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    User,
    Menu,
    TransactionType,
    Amount,
    Category,
    Period,
    DeleteEntry,
}

impl Focus {
    /// Tab order for the page shown under `menu`.
    pub(crate) fn order(menu: Menu) -> &'static [Focus] {
        match menu {
            Menu::AddExpense => &[
                Self::User,
                Self::Menu,
                Self::TransactionType,
                Self::Amount,
                Self::Category,
            ],
            Menu::ViewSummary => &[Self::User, Self::Menu, Self::Period, Self::DeleteEntry],
        }
    }

    /// Fields that consume printable characters as text.
    pub(crate) fn takes_text(self, app: &App) -> bool {
        match self {
            Self::Category => true,
            Self::User => app.picker.is_new_user(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteTransaction { user: String, id: i64, entry: usize },
}

/// Picks the session user: "New User" (free-text name) or an existing one.
#[derive(Debug, Clone, Default)]
pub(crate) struct UserPicker {
    pub(crate) users: Vec<String>,
    /// 0 is "New User"; `i > 0` is `users[i - 1]`.
    pub(crate) index: usize,
    pub(crate) new_name: String,
}

impl UserPicker {
    pub(crate) fn is_new_user(&self) -> bool {
        self.index == 0
    }

    pub(crate) fn label(&self) -> &str {
        match self.index {
            0 => NEW_USER,
            i => self.users.get(i - 1).map(String::as_str).unwrap_or(NEW_USER),
        }
    }

    /// The session user, if one has been chosen or typed.
    pub(crate) fn current(&self) -> Option<&str> {
        if self.is_new_user() {
            let name = self.new_name.trim();
            (!name.is_empty()).then_some(name)
        } else {
            self.users.get(self.index - 1).map(String::as_str)
        }
    }

    pub(crate) fn cycle(&mut self, delta: i32) {
        let len = self.users.len() + 1;
        self.index = wrap(self.index, delta, len);
    }

    /// Replace the known users, keeping the current selection where possible.
    pub(crate) fn set_users(&mut self, users: Vec<String>) {
        let selected = self.current().map(str::to_string);
        self.users = users;
        self.index = 0;
        if let Some(name) = selected {
            self.select(&name);
        }
    }

    /// Select `name` if it is a known user, otherwise type it as a new one.
    pub(crate) fn select(&mut self, name: &str) {
        match self.users.iter().position(|u| u == name) {
            Some(pos) => {
                self.index = pos + 1;
                self.new_name.clear();
            }
            None => {
                self.index = 0;
                self.new_name = name.to_string();
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct AddForm {
    pub(crate) transaction_type: TransactionType,
    pub(crate) amount: u32,
    pub(crate) category: String,
}

impl Default for AddForm {
    fn default() -> Self {
        Self {
            transaction_type: TransactionType::Credit,
            amount: AMOUNT_MIN,
            category: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SummaryView {
    pub(crate) period: Period,
    pub(crate) rows: Vec<Transaction>,
    pub(crate) balance: Decimal,
    /// 1-based entry number targeted by the delete form.
    pub(crate) delete_entry: usize,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) today: NaiveDate,

    pub(crate) menu: Menu,
    pub(crate) focus: Focus,
    pub(crate) picker: UserPicker,
    pub(crate) add_form: AddForm,
    pub(crate) summary: SummaryView,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            today: Local::now().date_naive(),

            menu: Menu::AddExpense,
            focus: Focus::User,
            picker: UserPicker::default(),
            add_form: AddForm::default(),
            summary: SummaryView::default(),

            pending_action: None,
            confirm_message: String::new(),
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    // ── Refresh ───────────────────────────────────────────────

    pub(crate) fn refresh_users(&mut self, db: &Database) -> Result<()> {
        let users = db.get_users()?;
        self.picker.set_users(users);
        Ok(())
    }

    pub(crate) fn refresh_summary(&mut self, db: &Database) -> Result<()> {
        self.summary.rows = match self.picker.current() {
            Some(user) => db.filter_by_period_on(user, self.summary.period, self.today)?,
            None => Vec::new(),
        };
        self.summary.balance = net_balance(&self.summary.rows);
        let len = self.summary.rows.len();
        self.summary.delete_entry = self.summary.delete_entry.clamp(len.min(1), len);
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_users(db)?;
        self.refresh_summary(db)
    }

    // ── Navigation ────────────────────────────────────────────

    pub(crate) fn cycle_focus(&mut self, delta: i32) {
        let order = Focus::order(self.menu);
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[wrap(idx, delta, order.len())];
    }

    /// Esc leaves a text field for the menu so `:` and `?` work again.
    pub(crate) fn escape(&mut self) {
        if self.focus.takes_text(self) {
            self.focus = Focus::Menu;
        }
        self.set_status("");
    }

    pub(crate) fn switch_menu(&mut self, menu: Menu, db: &Database) -> Result<()> {
        self.menu = menu;
        if !Focus::order(menu).contains(&self.focus) {
            self.focus = Focus::Menu;
        }
        if menu == Menu::ViewSummary {
            self.refresh_summary(db)?;
        }
        Ok(())
    }

    pub(crate) fn set_period(&mut self, period: Period, db: &Database) -> Result<()> {
        self.summary.period = period;
        self.summary.delete_entry = 1;
        self.refresh_summary(db)
    }

    /// Left/Right on choice fields, Up/Down on numeric ones.
    pub(crate) fn adjust_focused(&mut self, delta: i32, db: &Database) -> Result<()> {
        match self.focus {
            Focus::User => {
                self.picker.cycle(delta);
                self.summary.delete_entry = 1;
                self.refresh_summary(db)?;
            }
            Focus::Menu => self.switch_menu(self.menu.toggle(), db)?,
            Focus::TransactionType => {
                let kinds = TransactionType::all();
                let idx = kinds
                    .iter()
                    .position(|k| *k == self.add_form.transaction_type)
                    .unwrap_or(0);
                self.add_form.transaction_type = kinds[wrap(idx, delta, kinds.len())];
            }
            Focus::Amount => {
                let next = self.add_form.amount as i64 + delta as i64;
                self.add_form.amount = next.clamp(AMOUNT_MIN as i64, AMOUNT_MAX as i64) as u32;
            }
            Focus::Category => {}
            Focus::Period => {
                let periods = Period::all();
                let idx = periods
                    .iter()
                    .position(|p| *p == self.summary.period)
                    .unwrap_or(0);
                self.set_period(periods[wrap(idx, delta, periods.len())], db)?;
            }
            Focus::DeleteEntry => {
                let len = self.summary.rows.len();
                if len > 0 {
                    let next = self.summary.delete_entry as i64 + delta as i64;
                    self.summary.delete_entry = next.clamp(1, len as i64) as usize;
                }
            }
        }
        Ok(())
    }

    // ── Text entry ────────────────────────────────────────────

    pub(crate) fn type_char(&mut self, c: char, db: &Database) -> Result<()> {
        match self.focus {
            Focus::User if self.picker.is_new_user() => {
                self.picker.new_name.push(c);
                self.refresh_summary(db)?;
            }
            Focus::Category => self.add_form.category.push(c),
            Focus::Amount => {
                if let Some(d) = c.to_digit(10) {
                    let next = self.add_form.amount as u64 * 10 + d as u64;
                    if next <= AMOUNT_MAX as u64 {
                        self.add_form.amount = next as u32;
                    }
                }
            }
            Focus::DeleteEntry => {
                if let Some(d) = c.to_digit(10) {
                    let next = self.summary.delete_entry * 10 + d as usize;
                    if next <= self.summary.rows.len() {
                        self.summary.delete_entry = next;
                    } else if (1..=self.summary.rows.len()).contains(&(d as usize)) {
                        self.summary.delete_entry = d as usize;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn backspace(&mut self, db: &Database) -> Result<()> {
        match self.focus {
            Focus::User if self.picker.is_new_user() => {
                self.picker.new_name.pop();
                self.refresh_summary(db)?;
            }
            Focus::Category => {
                self.add_form.category.pop();
            }
            Focus::Amount => self.add_form.amount /= 10,
            Focus::DeleteEntry => {
                self.summary.delete_entry /= 10;
            }
            _ => {}
        }
        Ok(())
    }

    // ── Actions ───────────────────────────────────────────────

    /// Record the add form as a new transaction for the session user.
    pub(crate) fn submit_add(&mut self, db: &Database) -> Result<()> {
        let Some(user) = self.picker.current().map(str::to_string) else {
            self.set_status("Select a user or enter your name first");
            return Ok(());
        };
        let amount = self.add_form.amount;
        if !(AMOUNT_MIN..=AMOUNT_MAX).contains(&amount) {
            self.set_status(format!(
                "Amount must be between {AMOUNT_MIN} and {AMOUNT_MAX}"
            ));
            return Ok(());
        }

        let txn = Transaction::new(
            user,
            Decimal::from(amount),
            self.add_form.category.clone(),
            self.add_form.transaction_type,
            self.today,
        );
        db.insert_transaction(&txn)?;
        self.refresh_all(db)?;
        self.set_status("Transaction Added Successfully!");
        Ok(())
    }

    /// Ask for confirmation before deleting the entry in the delete form.
    pub(crate) fn request_delete(&mut self) {
        let Some(user) = self.picker.current().map(str::to_string) else {
            self.set_status("Select a user first");
            return;
        };
        let entry = self.summary.delete_entry;
        let target = entry
            .checked_sub(1)
            .and_then(|i| self.summary.rows.get(i))
            .and_then(|t| {
                let desc = format!(
                    "{} {} {}",
                    t.date,
                    t.category,
                    super::util::format_amount(t.amount)
                );
                t.id.map(|id| (id, desc))
            });
        let Some((id, desc)) = target else {
            match self.summary.rows.len() {
                0 => self.set_status("No transactions recorded yet!"),
                n => self.set_status(format!("Enter an S.No between 1 and {n}")),
            }
            return;
        };

        self.confirm_message = format!("Delete entry {entry} ({desc})?");
        self.pending_action = Some(PendingAction::DeleteTransaction { user, id, entry });
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn confirm_pending(&mut self, db: &Database) -> Result<()> {
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();
        let Some(action) = self.pending_action.take() else {
            return Ok(());
        };
        match action {
            PendingAction::DeleteTransaction { user, id, entry } => {
                if db.delete_transaction(&user, id)? == 0 {
                    self.set_status(format!("Entry {entry} no longer exists"));
                } else {
                    self.set_status("Expense deleted successfully!");
                }
                self.refresh_all(db)?;
            }
        }
        Ok(())
    }

    pub(crate) fn cancel_pending(&mut self) {
        self.pending_action = None;
        self.confirm_message.clear();
        self.input_mode = InputMode::Normal;
        self.set_status("Cancelled");
    }
}

/// Step `idx` by `delta` within `0..len`, wrapping at both ends.
fn wrap(idx: usize, delta: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (idx as i64 + delta as i64).rem_euclid(len as i64) as usize
}
