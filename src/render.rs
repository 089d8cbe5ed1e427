//! Terminal rendering for the kiosk.
//!
//! [`TerminalView`] implements [`KioskView`] by writing the transcript, the
//! order panel, and numbered suggestion chips to a terminal with optional ANSI
//! styling.  [`PromptWriter`] keeps the line editor's prompt intact when output
//! arrives while the customer is typing, e.g. from the post-checkout restart.

use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::types::Menu;
use crate::view::{EMPTY_ORDER_PLACEHOLDER, KioskView, OrderPanel, Sender, format_price};

/// ANSI escape code for bold text (used for transcript labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for placeholders and separators).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the assistant label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for suggestion chips).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for green text (used for the order total).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for alerts and errors).
const ANSI_RED: &str = "\x1b[31m";

/// Return to column zero and erase the line.
const ERASE_LINE: &str = "\r\x1b[2K";

/// Writer for output that can arrive while a line editor shows its prompt.
///
/// While `at_prompt` is set, the first write after a flush erases the prompt
/// line and the flush that ends the output draws the prompt again.
pub struct PromptWriter<W: Write = Stdout> {
    out: W,
    prompt: String,
    at_prompt: Arc<AtomicBool>,
    erased: bool,
}

impl PromptWriter<Stdout> {
    /// A prompt-aware writer on stdout.
    pub fn stdout(prompt: impl Into<String>, at_prompt: Arc<AtomicBool>) -> Self {
        Self::new(io::stdout(), prompt, at_prompt)
    }
}

impl<W: Write> PromptWriter<W> {
    /// Wraps `out`.  The caller sets `at_prompt` while the prompt is on screen.
    pub fn new(out: W, prompt: impl Into<String>, at_prompt: Arc<AtomicBool>) -> Self {
        Self {
            out,
            prompt: prompt.into(),
            at_prompt,
            erased: false,
        }
    }

    /// Consumes the writer and returns the wrapped one.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Write for PromptWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.erased && self.at_prompt.load(Ordering::Acquire) {
            self.out.write_all(ERASE_LINE.as_bytes())?;
            self.erased = true;
        }
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.erased {
            self.erased = false;
            if self.at_prompt.load(Ordering::Acquire) {
                self.out.write_all(self.prompt.as_bytes())?;
            }
        }
        self.out.flush()
    }
}

/// Kiosk view that writes to a terminal.
pub struct TerminalView<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
    checkout_enabled: bool,
    last_panel: OrderPanel,
}

impl TerminalView<Stdout> {
    /// Creates a new TerminalView on stdout with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new TerminalView on stdout with the specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl Default for TerminalView<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> TerminalView<W> {
    /// Creates a TerminalView over any writer.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self {
            out,
            use_color,
            checkout_enabled: false,
            last_panel: OrderPanel::Empty,
        }
    }

    /// The underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consumes the view and returns its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Whether checkout is currently offered.
    pub fn checkout_enabled(&self) -> bool {
        self.checkout_enabled
    }

    /// Print an informational message outside the transcript.
    pub fn print_info(&mut self, info: &str) {
        self.write_line(info);
    }

    /// Print an error message outside the transcript.
    pub fn print_error(&mut self, error: &str) {
        let line = self.styled(ANSI_RED, &format!("Error: {error}"));
        self.write_line(&line);
    }

    /// Re-print the most recently rendered order panel.
    pub fn show_order(&mut self) {
        let panel = self.last_panel.clone();
        self.write_panel(&panel);
    }

    /// Print the menu, one section per category.
    pub fn show_menu(&mut self, menu: &Menu) {
        let text = format_menu(menu);
        self.write_line(text.trim_end());
    }

    fn styled(&self, code: &str, text: &str) -> String {
        if self.use_color {
            format!("{code}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    fn write_line(&mut self, line: &str) {
        let _ = writeln!(self.out, "{line}");
        let _ = self.out.flush();
    }

    fn write_panel(&mut self, panel: &OrderPanel) {
        let header = self.styled(ANSI_BOLD, "Your Order");
        self.write_line(&format!("  {header}"));
        match panel {
            OrderPanel::Empty => {
                let placeholder = self.styled(ANSI_DIM, EMPTY_ORDER_PLACEHOLDER);
                self.write_line(&format!("    {placeholder}"));
            }
            OrderPanel::Items { rows, .. } => {
                for row in rows {
                    self.write_line(&format!(
                        "    {:<24} x{:<3} {:>9}",
                        row.name, row.quantity, row.line_total
                    ));
                }
            }
        }
        let total = self.styled(ANSI_GREEN, &panel.total());
        self.write_line(&format!("  Total: {total}"));
    }
}

impl<W: Write + Send> KioskView for TerminalView<W> {
    fn clear_transcript(&mut self) {
        let separator = self.styled(ANSI_DIM, "──────────── new order ────────────");
        self.write_line(&separator);
    }

    fn add_message(&mut self, sender: Sender, text: &str) {
        let label = match sender {
            Sender::User => self.styled(ANSI_BOLD, sender.label()),
            Sender::Assistant => self.styled(ANSI_CYAN, sender.label()),
        };
        self.write_line(&format!("{label}: {text}"));
    }

    fn render_order(&mut self, panel: &OrderPanel) {
        self.last_panel = panel.clone();
        self.write_panel(panel);
    }

    fn set_checkout_enabled(&mut self, enabled: bool) {
        if enabled && !self.checkout_enabled {
            let hint = self.styled(ANSI_DIM, "  (type /checkout to complete your order)");
            self.write_line(&hint);
        }
        self.checkout_enabled = enabled;
    }

    fn render_suggestions(&mut self, suggestions: &[String]) {
        if suggestions.is_empty() {
            return;
        }
        let chips = suggestions
            .iter()
            .enumerate()
            .map(|(idx, suggestion)| self.styled(ANSI_YELLOW, &format!("[{}] {suggestion}", idx + 1)))
            .collect::<Vec<_>>()
            .join("  ");
        self.write_line(&format!("  {chips}"));
    }

    fn alert(&mut self, message: &str) {
        let line = self.styled(ANSI_RED, &format!("!! {message}"));
        self.write_line(&line);
    }
}

/// Render the menu as plain text.
pub fn format_menu(menu: &Menu) -> String {
    let mut text = String::new();
    for (category, items) in menu.sections() {
        text.push_str(&capitalize(category));
        text.push('\n');
        for item in items {
            let mut line = format!("  {:<24} {:>8}", item.name, format_price(item.price));
            if !item.available {
                line.push_str("  (sold out)");
            }
            text.push_str(line.trim_end());
            text.push('\n');
            if !item.description.is_empty() {
                text.push_str(&format!("      {}\n", item.description));
            }
        }
    }
    text
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MenuItem, Order, OrderItem};
    use std::collections::HashMap;

    fn plain() -> TerminalView<Vec<u8>> {
        TerminalView::with_writer(Vec::new(), false)
    }

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn view_default_has_color() {
        let view = TerminalView::new();
        assert!(view.use_color);
    }

    #[test]
    fn transcript_labels() {
        let mut view = plain();
        view.add_message(Sender::User, "one burger");
        view.add_message(Sender::Assistant, "Added 1 Classic Burger.");
        assert_eq!(
            output(view),
            "You: one burger\nAssistant: Added 1 Classic Burger.\n"
        );
    }

    #[test]
    fn colored_labels_reset() {
        let mut view = TerminalView::with_writer(Vec::new(), true);
        view.add_message(Sender::Assistant, "hi");
        let text = output(view);
        assert!(text.starts_with(ANSI_CYAN));
        assert!(text.contains(ANSI_RESET));
    }

    #[test]
    fn empty_panel() {
        let mut view = plain();
        view.render_order(&OrderPanel::Empty);
        let text = output(view);
        assert!(text.contains(EMPTY_ORDER_PLACEHOLDER));
        assert!(text.contains("Total: $0.00"));
    }

    #[test]
    fn item_panel_and_reprint() {
        let order = Order::new(vec![OrderItem::new("Burger", 2, 5.0)], 10.0);
        let mut view = plain();
        view.render_order(&OrderPanel::from_order(Some(&order)));
        view.show_order();
        let text = output(view);
        assert_eq!(text.matches("$10.00").count(), 4);
        assert_eq!(text.matches("Burger").count(), 2);
    }

    #[test]
    fn checkout_hint_only_on_transition() {
        let mut view = plain();
        view.set_checkout_enabled(true);
        view.set_checkout_enabled(true);
        assert!(view.checkout_enabled());
        view.set_checkout_enabled(false);
        assert!(!view.checkout_enabled());
        assert_eq!(output(view).matches("/checkout").count(), 1);
    }

    #[test]
    fn numbered_chips() {
        let mut view = plain();
        view.render_suggestions(&[]);
        view.render_suggestions(&["Add fries".to_string(), "Would you like a drink?".to_string()]);
        assert_eq!(output(view), "  [1] Add fries  [2] Would you like a drink?\n");
    }

    #[test]
    fn output_at_prompt_redraws_prompt() {
        let at_prompt = Arc::new(AtomicBool::new(true));
        let writer = PromptWriter::new(Vec::new(), "> ", Arc::clone(&at_prompt));
        let mut view = TerminalView::with_writer(writer, false);
        view.add_message(Sender::Assistant, "Welcome to NoPickles!");
        view.render_suggestions(&["Add fries".to_string()]);
        let text = String::from_utf8(view.into_inner().into_inner()).unwrap();
        assert_eq!(
            text,
            "\r\x1b[2KAssistant: Welcome to NoPickles!\n> \r\x1b[2K  [1] Add fries\n> "
        );
    }

    #[test]
    fn output_off_prompt_passes_through() {
        let at_prompt = Arc::new(AtomicBool::new(false));
        let writer = PromptWriter::new(Vec::new(), "> ", Arc::clone(&at_prompt));
        let mut view = TerminalView::with_writer(writer, false);
        view.add_message(Sender::User, "one burger");
        at_prompt.store(true, Ordering::Release);
        view.print_info("Goodbye!");
        let text = String::from_utf8(view.into_inner().into_inner()).unwrap();
        assert_eq!(text, "You: one burger\n\r\x1b[2KGoodbye!\n> ");
    }

    #[test]
    fn menu_sections() {
        let mut items_by_category = HashMap::new();
        items_by_category.insert(
            "sides".to_string(),
            vec![MenuItem {
                id: "onion_rings".to_string(),
                name: "Onion Rings".to_string(),
                category: "sides".to_string(),
                price: 4.49,
                description: "Crispy battered onion rings".to_string(),
                available: false,
            }],
        );
        let menu = Menu {
            categories: vec!["sides".to_string()],
            items_by_category,
        };
        let text = format_menu(&menu);
        assert!(text.starts_with("Sides\n"));
        assert!(text.contains("$4.49  (sold out)"));
        assert!(text.contains("Crispy battered onion rings"));
    }
}
