//! Main application entry point

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use eframe::egui::{self, Context};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;

use aw_core::{DataSource, Snapshot};
use aw_data::{DashboardConfig, HttpSource, Scheduler, SnapshotCache};
use aw_ui::{ShellAction, StatusInfo, Theme};
use aw_views::{Dashboard, Viewport};

mod demo;

use demo::DemoSource;

/// Main application state
struct AlertWatchApp {
    dashboard: Dashboard,
    viewport: Viewport,
    scheduler: Scheduler,
    cache: SnapshotCache,

    /// Snapshots delivered by the scheduler
    updates: UnboundedReceiver<Snapshot>,

    theme: Theme,

    /// Kept last so polling tasks are aborted before the runtime shuts down
    _runtime: tokio::runtime::Runtime,
}

impl AlertWatchApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        config: DashboardConfig,
        source: Arc<dyn DataSource>,
        period: Duration,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        let theme = Theme::default();
        aw_ui::apply_theme(&cc.egui_ctx, &theme);

        let cache = SnapshotCache::new();
        let (sender, updates) = mpsc::unbounded_channel();

        let egui_ctx = cc.egui_ctx.clone();
        let mut scheduler = Scheduler::new(source, cache.clone(), sender, period, runtime.handle().clone())
            .with_repaint_hook(Arc::new(move || egui_ctx.request_repaint()));
        scheduler.start();

        Self {
            dashboard: Dashboard::new(&config),
            viewport: Viewport::new(),
            scheduler,
            cache,
            updates,
            theme,
            _runtime: runtime,
        }
    }

    /// Apply every snapshot received since the last frame
    fn drain_updates(&mut self) {
        while let Ok(snapshot) = self.updates.try_recv() {
            self.dashboard.apply(snapshot);
        }
    }

    fn handle_shell_action(&mut self, ctx: &Context, action: ShellAction) {
        match action {
            ShellAction::RefreshNow => {
                info!("Manual refresh");
                self.scheduler.tick_all();
            }
            ShellAction::ResetLayout => self.viewport.reset_layout(),
            ShellAction::ToggleTheme => {
                self.theme = self.theme.toggled();
                aw_ui::apply_theme(ctx, &self.theme);
            }
            ShellAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }
}

impl eframe::App for AlertWatchApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.drain_updates();

        if let Some(action) = aw_ui::menu_bar(ctx, self.theme.dark_mode) {
            self.handle_shell_action(ctx, action);
        }

        aw_ui::status_bar(ctx, &StatusInfo {
            source_name: self.scheduler.source_name(),
            poll_interval: self.scheduler.period(),
            cache: &self.cache,
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.viewport.ui(ui, &mut self.dashboard);
        });

        // Keeps the status bar ages current between snapshots
        ctx.request_repaint_after(Duration::from_secs(1));
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = DashboardConfig::from_env().context("Failed to load configuration")?;
    let period = config.poll_interval()?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let source: Arc<dyn DataSource> = if config.demo {
        info!("Starting in demo mode");
        Arc::new(DemoSource::default())
    } else {
        info!("Starting against {}", config.base_url);
        Arc::new(HttpSource::from_config(&config)?)
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([800.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        ..Default::default()
    };

    eframe::run_native(
        "AlertWatch - Security Alert Dashboard",
        options,
        Box::new(move |cc| {
            Box::new(AlertWatchApp::new(cc, config, source, period, runtime))
        }),
    ).map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
