use chrono::{DateTime, Local, Utc};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    catalog,
    domain::{total_quantity, BasketEntry},
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Storage => "Storage",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

/// Indicator badge text. `None` hides the badge entirely.
pub fn indicator_label(total: u32) -> Option<String> {
    (total > 0).then(|| total.to_string())
}

/// One rendered basket line, or `None` when the product is not in the
/// catalog; unknown products are skipped, not placeholders.
pub fn basket_line(entry: &BasketEntry) -> Option<String> {
    let product = catalog::product_info(&entry.product)?;
    Some(format!(
        "{} {}x {}",
        product.glyph, entry.quantity, product.name
    ))
}

pub struct ShopApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    basket: Vec<BasketEntry>,
    basket_saved_at: Option<DateTime<Utc>>,
    basket_panel_open: bool,
    status: String,
    banner: Option<StatusBanner>,
}

impl ShopApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            basket: Vec::new(),
            basket_saved_at: None,
            basket_panel_open: true,
            status: "Starting...".to_string(),
            banner: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::BasketUpdated { entries, saved_at } => {
                    self.basket = entries;
                    self.basket_saved_at = saved_at;
                    self.banner = None;
                }
                UiEvent::Error(err) => self.show_error_banner(&err),
            }
        }
    }

    fn show_error_banner(&mut self, err: &UiError) {
        self.banner = Some(StatusBanner {
            severity: StatusBannerSeverity::Error,
            message: format!("{}: {}", err_label(err.category()), err.message()),
        });
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("shop_top_bar")
            .resizable(false)
            .exact_height(30.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Prototype Shop").strong());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        // Badge first: right-to-left layout places it at the
                        // far edge, next to the basket toggle.
                        if let Some(badge) = indicator_label(total_quantity(&self.basket)) {
                            ui.label(
                                egui::RichText::new(format!(" {badge} "))
                                    .strong()
                                    .color(egui::Color32::WHITE)
                                    .background_color(egui::Color32::from_rgb(196, 58, 58)),
                            );
                        }

                        if ui.button("Basket").clicked() {
                            self.basket_panel_open = !self.basket_panel_open;
                            if self.basket_panel_open {
                                dispatch_backend_command(
                                    &self.cmd_tx,
                                    BackendCommand::RefreshBasket,
                                    &mut self.status,
                                );
                            }
                        }
                    });
                });
            });
    }

    fn show_basket_panel(&mut self, ctx: &egui::Context) {
        // Closed panel: the render step is skipped, never an error.
        if !self.basket_panel_open {
            return;
        }

        egui::SidePanel::right("basket_panel")
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Basket");
                ui.separator();

                if self.basket.is_empty() {
                    ui.label("No products in basket.");
                    return;
                }

                for entry in &self.basket {
                    if let Some(line) = basket_line(entry) {
                        ui.label(line);
                    }
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Checkout").clicked() {
                        self.status = "Checkout is not part of this prototype".to_string();
                    }
                    if ui.button("Clear basket").clicked() {
                        dispatch_backend_command(
                            &self.cmd_tx,
                            BackendCommand::ClearBasket,
                            &mut self.status,
                        );
                    }
                });
            });
    }

    fn show_central(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(banner) = self.banner.clone() {
                let fill = match banner.severity {
                    StatusBannerSeverity::Error => egui::Color32::from_rgb(84, 34, 34),
                };
                egui::Frame::new()
                    .fill(fill)
                    .inner_margin(egui::Margin::same(6))
                    .corner_radius(egui::CornerRadius::same(4))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                    });
                ui.add_space(8.0);
            }

            ui.heading("Products");
            ui.separator();

            for product in catalog::PRODUCTS {
                ui.horizontal(|ui| {
                    ui.label(product.glyph);
                    ui.label(product.name);
                    if ui.button("Add to basket").clicked() {
                        dispatch_backend_command(
                            &self.cmd_tx,
                            BackendCommand::AddProduct {
                                product_id: product.id.to_string(),
                            },
                            &mut self.status,
                        );
                    }
                });
            }
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("shop_status_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.small(&self.status);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(saved_at) = self.basket_saved_at {
                            ui.small(format!(
                                "Basket saved {}",
                                saved_at.with_timezone(&Local).format("%H:%M:%S")
                            ));
                        }
                    });
                });
            });
    }
}

impl eframe::App for ShopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        self.show_basket_panel(ctx);
        self.show_central(ctx);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_shows_total_when_positive() {
        let basket = vec![BasketEntry::new("apple", 2), BasketEntry::new("banana", 1)];
        assert_eq!(total_quantity(&basket), 3);
        assert_eq!(indicator_label(total_quantity(&basket)).as_deref(), Some("3"));
    }

    #[test]
    fn indicator_hides_for_empty_basket() {
        assert_eq!(indicator_label(total_quantity(&[])), None);
    }

    #[test]
    fn basket_line_renders_quantity_and_display_name() {
        let line = basket_line(&BasketEntry::new("apple", 2)).expect("catalog entry");
        assert_eq!(line, "🍏 2x Apple");
    }

    #[test]
    fn basket_line_skips_unknown_products() {
        assert!(basket_line(&BasketEntry::new("durian", 1)).is_none());
    }
}
