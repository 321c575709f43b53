//! Alert table view
//!
//! Reconciliation happens in two steps. [`page_rows`] is a pure function from
//! the alert collection and pagination cursor to the rows of the current
//! page. [`AlertTableView::render`] then replaces the rendered row set.
//!
//! The text filter works on the rendered rows only, not on the collection.
//! The next render (every poll, or a page change) shows all rows again even
//! though the search box keeps its text.

use egui::{Ui, RichText, Sense};
use uuid::Uuid;

use aw_core::{Alert, PaginationControls, PaginationState, Resource, Severity};

use crate::charts::severity_color;
use crate::{DashboardView, ViewAction, ViewId};

/// Threat lookup page for a source address
pub fn address_link(address: &str) -> String {
    format!("https://www.virustotal.com/gui/ip-address/{}/details", address)
}

/// One table row as displayed
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRow {
    pub message: String,
    pub address: String,
    pub address_link: String,
    pub severity: Severity,
    pub location: String,
}

impl AlertRow {
    pub fn from_alert(alert: &Alert) -> Self {
        Self {
            message: alert.message.clone(),
            address: alert.source_address.clone(),
            address_link: address_link(&alert.source_address),
            severity: alert.severity,
            location: alert.location.clone(),
        }
    }

    /// Concatenated visible text of the row
    pub fn text(&self) -> String {
        format!("{} {} {} {}", self.message, self.address, self.severity, self.location)
    }
}

/// Rows of the current page
pub fn page_rows(alerts: &[Alert], pagination: &PaginationState) -> Vec<AlertRow> {
    pagination.page(alerts).iter().map(AlertRow::from_alert).collect()
}

#[derive(Debug, Clone)]
struct RenderedRow {
    row: AlertRow,
    search_text: String,
    visible: bool,
}

/// Paginated, filterable alert table
pub struct AlertTableView {
    id: ViewId,
    title: String,

    // State
    alerts: Vec<Alert>,
    pagination: PaginationState,
    rows: Vec<RenderedRow>,
    search: String,
}

impl AlertTableView {
    /// Create a new table view
    pub fn new(page_size: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Recent Alerts".to_string(),
            alerts: Vec::new(),
            pagination: PaginationState::new(page_size),
            rows: Vec::new(),
            search: String::new(),
        }
    }

    /// Replace the alert collection and re-render the current page.
    /// The page cursor is kept, clamped to the new length.
    pub fn replace_alerts(&mut self, alerts: Vec<Alert>) {
        self.alerts = alerts;
        self.refresh();
    }

    /// Move by `delta` pages and re-render
    pub fn change_page(&mut self, delta: isize) {
        self.pagination.change_page(delta, self.alerts.len());
        self.refresh();
    }

    fn refresh(&mut self) {
        if self.pagination.clamp(self.alerts.len()) {
            tracing::debug!("Alert page clamped to {}", self.pagination.current_page());
        }
        let rows = page_rows(&self.alerts, &self.pagination);
        self.render(rows);
    }

    /// Replace the rendered rows. Every row starts visible.
    pub fn render(&mut self, rows: Vec<AlertRow>) {
        self.rows = rows
            .into_iter()
            .map(|row| RenderedRow {
                search_text: row.text().to_lowercase(),
                row,
                visible: true,
            })
            .collect();
    }

    /// Show only rendered rows whose text contains `query` (case-insensitive).
    /// Returns the number of visible rows.
    pub fn filter(&mut self, query: &str) -> usize {
        let query = query.to_lowercase();
        for rendered in &mut self.rows {
            rendered.visible = rendered.search_text.contains(&query);
        }
        self.rows.iter().filter(|r| r.visible).count()
    }

    /// Rendered rows that pass the current filter
    pub fn visible_rows(&self) -> impl Iterator<Item = &AlertRow> {
        self.rows.iter().filter(|r| r.visible).map(|r| &r.row)
    }

    pub fn rendered_len(&self) -> usize {
        self.rows.len()
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn controls(&self) -> PaginationControls {
        self.pagination.controls(self.alerts.len())
    }

    fn render_table(&self, ui: &mut Ui, actions: &mut Vec<ViewAction>) {
        use egui_extras::{TableBuilder, Column};

        let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;

        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(260.0).at_least(120.0).clip(true))
            .column(Column::initial(120.0).at_least(90.0))
            .column(Column::initial(80.0).at_least(60.0))
            .column(Column::remainder().at_least(100.0).clip(true))
            .min_scrolled_height(0.0)
            .header(20.0, |mut header| {
                for name in ["Alert", "Source IP", "Severity", "Location"] {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for row in self.visible_rows() {
                    body.row(text_height, |mut table_row| {
                        table_row.col(|ui| {
                            let label = egui::Label::new(RichText::new(row.message.as_str()).strong())
                                .sense(Sense::click());
                            if ui.add(label).on_hover_text("Show on map").clicked() {
                                actions.push(ViewAction::LocateOnMap(row.text()));
                            }
                        });
                        table_row.col(|ui| {
                            ui.hyperlink_to(row.address.as_str(), row.address_link.as_str());
                        });
                        table_row.col(|ui| {
                            ui.label(RichText::new(row.severity.as_str()).color(severity_color(row.severity)));
                        });
                        table_row.col(|ui| {
                            ui.label(row.location.as_str());
                        });
                    });
                }
            });
    }
}

impl DashboardView for AlertTableView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "AlertTableView"
    }

    fn resource(&self) -> Resource {
        Resource::Alerts
    }

    fn ui(&mut self, ui: &mut Ui, actions: &mut Vec<ViewAction>) {
        ui.horizontal(|ui| {
            let search = egui::TextEdit::singleline(&mut self.search).hint_text("Search alerts...");
            if ui.add(search).changed() {
                let query = self.search.clone();
                self.filter(&query);
            }
            ui.separator();
            ui.label(format!("Alerts: {}", self.alerts.len()));
        });

        ui.add_space(4.0);

        if self.rows.is_empty() {
            ui.label(RichText::new("No alerts on this page").weak());
        } else {
            egui::ScrollArea::both()
                .id_source(("alert_table", self.id))
                .max_height((ui.available_height() - 32.0).max(60.0))
                .show(ui, |ui| {
                    self.render_table(ui, actions);
                });
        }

        let controls = self.controls();
        ui.horizontal(|ui| {
            if ui.add_enabled(controls.previous_enabled, egui::Button::new("Previous")).clicked() {
                self.change_page(-1);
            }
            ui.label(controls.label());
            if ui.add_enabled(controls.next_enabled, egui::Button::new("Next")).clicked() {
                self.change_page(1);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(message: &str, ip: &str, severity: Severity) -> Alert {
        Alert {
            message: message.to_string(),
            source_address: ip.to_string(),
            severity,
            location: "Paris, France".to_string(),
        }
    }

    fn alerts(n: usize) -> Vec<Alert> {
        (0..n)
            .map(|i| alert(&format!("ICMP Ping detected #{i}"), &format!("10.0.0.{i}"), Severity::Low))
            .collect()
    }

    #[test]
    fn test_empty_collection() {
        let mut table = AlertTableView::new(5);
        table.replace_alerts(Vec::new());

        assert_eq!(table.rendered_len(), 0);
        let controls = table.controls();
        assert_eq!(controls.label(), "Page 1 of 1");
        assert!(!controls.previous_enabled);
        assert!(!controls.next_enabled);
    }

    #[test]
    fn test_render_is_idempotent() {
        let collection = alerts(12);
        let pagination = PaginationState::new(5);

        let first = page_rows(&collection, &pagination);
        let second = page_rows(&collection, &pagination);
        assert_eq!(first, second);

        let mut table = AlertTableView::new(5);
        table.render(first.clone());
        let once: Vec<AlertRow> = table.visible_rows().cloned().collect();
        table.render(first);
        let twice: Vec<AlertRow> = table.visible_rows().cloned().collect();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 5);
    }

    #[test]
    fn test_row_exposes_link() {
        let row = AlertRow::from_alert(&alert("SYN Flood detected", "203.0.113.7", Severity::High));
        assert_eq!(row.address_link, "https://www.virustotal.com/gui/ip-address/203.0.113.7/details");
        assert_eq!(row.text(), "SYN Flood detected 203.0.113.7 High Paris, France");
    }

    #[test]
    fn test_page_survives_replacement() {
        let mut table = AlertTableView::new(5);
        table.replace_alerts(alerts(12));
        table.change_page(1);
        assert_eq!(table.pagination().current_page(), 2);

        table.replace_alerts(alerts(14));
        assert_eq!(table.pagination().current_page(), 2);
        let first = table.visible_rows().next().unwrap();
        assert_eq!(first.address, "10.0.0.5");
    }

    #[test]
    fn test_shrinking_collection_clamps_page() {
        let mut table = AlertTableView::new(5);
        table.replace_alerts(alerts(20));
        table.change_page(3);
        assert_eq!(table.pagination().current_page(), 4);

        table.replace_alerts(alerts(6));
        assert_eq!(table.pagination().current_page(), 2);
        assert_eq!(table.rendered_len(), 1);
        assert!(!table.controls().next_enabled);
    }

    #[test]
    fn test_filter_is_case_insensitive_over_rendered_rows() {
        let mut table = AlertTableView::new(5);
        table.replace_alerts(vec![
            alert("SYN Flood detected", "10.0.0.1", Severity::High),
            alert("ARP Spoofing detected", "10.0.0.2", Severity::Medium),
            alert("Brute Force attempt detected", "10.0.0.3", Severity::High),
        ]);

        assert_eq!(table.filter("HIGH"), 2);
        assert_eq!(table.filter("10.0.0.2"), 1);
        assert_eq!(table.visible_rows().next().unwrap().message, "ARP Spoofing detected");
        assert_eq!(table.filter(""), 3);
    }

    #[test]
    fn test_filter_does_not_reach_other_pages() {
        let mut table = AlertTableView::new(5);
        let mut collection = alerts(5);
        collection.push(alert("SYN Flood detected", "192.168.1.9", Severity::High));
        table.replace_alerts(collection);

        // The matching alert sits on page 2, which is not rendered
        assert_eq!(table.filter("syn flood"), 0);
    }

    #[test]
    fn test_next_render_drops_filter() {
        let mut table = AlertTableView::new(5);
        table.replace_alerts(alerts(4));
        assert_eq!(table.filter("#2"), 1);

        // Periodic poll delivers the same collection again
        table.replace_alerts(alerts(4));
        assert_eq!(table.visible_rows().count(), 4);
    }
}
