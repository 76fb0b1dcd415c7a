//! Main application state and UI rendering.

use chrono::{Datelike, NaiveDate};
use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Vec2};
use egui_plot::{Bar, BarChart, Plot};
use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Instant;

use feelviz::data::{load_from_paths, ItemId, ItemType, LoadReport, LoadedData};
use feelviz::graph::{ForceLayout, LayoutState};
use feelviz::mood::MoodState;
use feelviz::settings::Settings;
use feelviz::stats::{pie_slices, PieSlice};
use feelviz::summary::MoodSummary;
use feelviz::theme;
use feelviz::timeline::RangeSelector;
use feelviz::{Engine, FeelvizError};

/// User events collected while drawing and applied afterwards
#[derive(Debug, Clone, PartialEq)]
enum UiAction {
    SetRange(NaiveDate, NaiveDate),
    SetMoodFilter(Option<MoodState>),
    ClickNode(ItemId),
    ClickMood(MoodState),
}

/// Main dashboard application
pub struct FeelvizApp {
    // Data
    engine: Option<Engine>,
    load_receiver: Option<Receiver<feelviz::Result<LoadedData>>>,
    load_report: Option<LoadReport>,
    load_error: Option<String>,
    last_error: Option<String>,

    // Graph state
    layout: ForceLayout,
    layout_state: LayoutState,
    physics_enabled: bool,

    // Display
    node_scale: f32,
    show_labels: bool,
    label_size: f32,

    // Range selector
    range: Option<RangeSelector>,

    // Viewport state
    pan_offset: Vec2,
    zoom: f32,

    // Settings persistence
    settings: Settings,
    settings_dirty: bool,
    last_settings_save: Instant,
}

impl FeelvizApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Settings::load();

        let layout = ForceLayout {
            repulsion: settings.repulsion,
            attraction: settings.attraction,
            centering: settings.centering,
            link_distance: settings.link_distance,
            ..ForceLayout::default()
        };

        let mut app = Self {
            engine: None,
            load_receiver: None,
            load_report: None,
            load_error: None,
            last_error: None,
            layout,
            layout_state: LayoutState::default(),
            physics_enabled: settings.physics_enabled,
            node_scale: settings.node_scale,
            show_labels: settings.show_labels,
            label_size: settings.label_size,
            range: None,
            pan_offset: Vec2::ZERO,
            zoom: 1.0,
            settings,
            settings_dirty: false,
            last_settings_save: Instant::now(),
        };

        app.start_load();
        app
    }

    /// Read both tables on a background thread
    fn start_load(&mut self) {
        let nodes = self.settings.nodes_path();
        let day_stats = self.settings.day_stats_path();
        tracing::info!("Loading journal from {:?} and {:?}", nodes, day_stats);

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let result = load_from_paths(&nodes, &day_stats);
            let _ = tx.send(result);
        });

        self.load_receiver = Some(rx);
        self.load_error = None;
    }

    fn poll_load(&mut self, ctx: &egui::Context) {
        let Some(ref rx) = self.load_receiver else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(loaded)) => {
                self.load_receiver = None;
                self.on_loaded(loaded);
            }
            Ok(Err(e)) => {
                tracing::error!("Failed to load journal: {}", e);
                self.load_error = Some(e.to_string());
                self.load_receiver = None;
            }
            Err(TryRecvError::Empty) => {
                // Still loading, request repaint to check again
                ctx.request_repaint();
            }
            Err(TryRecvError::Disconnected) => {
                self.load_error = Some("Loader thread stopped unexpectedly".to_string());
                self.load_receiver = None;
            }
        }
    }

    fn on_loaded(&mut self, loaded: LoadedData) {
        self.load_report = Some(loaded.report.clone());
        match Engine::from_loaded(loaded, self.settings.engine_config()) {
            Ok(engine) => {
                self.range = Some(RangeSelector::new(*engine.bounds(), engine.filter()));
                self.layout_state = LayoutState::default();
                self.engine = Some(engine);
            }
            Err(e) => {
                tracing::error!("Failed to build initial snapshot: {}", e);
                self.load_error = Some(e.to_string());
            }
        }
    }

    /// Run one user event through the engine
    fn apply(&mut self, action: UiAction) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        tracing::debug!("Applying {:?}", action);

        let outcome = match &action {
            UiAction::SetRange(start, end) => engine.set_date_range(*start, *end).map(|_| ()),
            UiAction::SetMoodFilter(state) => engine.set_mood_filter(*state).map(|_| ()),
            UiAction::ClickNode(id) => engine.click_node(id).map(|_| ()),
            UiAction::ClickMood(state) => engine.click_mood_slice(*state).map(|_| ()),
        };

        match outcome {
            Ok(()) => {
                self.last_error = None;
                if matches!(action, UiAction::SetRange(..)) {
                    self.mark_settings_dirty();
                }
            }
            Err(e) => self.report_error(e),
        }

        // The selector always mirrors the committed range
        if let (Some(range), Some(engine)) = (self.range.as_mut(), self.engine.as_ref()) {
            range.sync(engine.filter());
        }
    }

    fn report_error(&mut self, e: FeelvizError) {
        if e.is_recoverable() {
            tracing::warn!("Rejected: {}", e);
        } else {
            tracing::error!("{}", e);
        }
        self.last_error = Some(e.to_string());
    }

    /// Mark settings as needing to be saved
    fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    /// Copy current UI state to settings struct
    fn sync_settings_from_ui(&mut self) {
        self.settings.node_scale = self.node_scale;
        self.settings.show_labels = self.show_labels;
        self.settings.label_size = self.label_size;
        self.settings.physics_enabled = self.physics_enabled;
        self.settings.repulsion = self.layout.repulsion;
        self.settings.attraction = self.layout.attraction;
        self.settings.centering = self.layout.centering;
        self.settings.link_distance = self.layout.link_distance;
        if let Some(engine) = &self.engine {
            self.settings.last_range = Some((engine.filter().start(), engine.filter().end()));
        }
    }

    /// Save settings if dirty and enough time has passed (debounce)
    fn maybe_save_settings(&mut self) {
        if self.settings_dirty && self.last_settings_save.elapsed().as_secs() >= 2 {
            self.sync_settings_from_ui();
            self.settings.save();
            self.settings_dirty = false;
            self.last_settings_save = Instant::now();
        }
    }

    fn render_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading("Feelviz");
        ui.add_space(8.0);

        if self.load_receiver.is_some() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading journal...");
            });
        }
        let retry = match &self.load_error {
            Some(err) => {
                ui.colored_label(theme::state::ERROR, format!("Load failed: {}", err));
                ui.button("Retry").clicked()
            }
            None => false,
        };
        if retry {
            self.start_load();
        }
        if let Some(err) = &self.last_error {
            ui.colored_label(theme::state::WARNING, err.as_str());
        }

        let mut action = None;
        if let Some(engine) = &self.engine {
            let snapshot = engine.snapshot();
            let summary = &snapshot.summary;

            ui.separator();
            ui.label(
                egui::RichText::new(format!(
                    "{} → {} ({})",
                    snapshot.filter.start(),
                    snapshot.filter.end(),
                    summary.day_count_text()
                ))
                .strong(),
            );
            ui.add_space(4.0);
            ui.label(summary.node_text.as_str());
            ui.add_space(4.0);
            match &summary.mood {
                MoodSummary::AllFeelings => {
                    ui.label(MoodSummary::ALL_FEELINGS_TEXT);
                }
                MoodSummary::Feeling { name, color } => {
                    ui.horizontal_wrapped(|ui| {
                        ui.spacing_mut().item_spacing.x = 0.0;
                        ui.label("Selected feeling: ");
                        ui.label(egui::RichText::new(*name).color(*color).strong());
                        ui.label(".");
                    });
                }
            }

            ui.add_space(8.0);
            let current = snapshot.filter.mood_state();
            let mut chosen = current;
            egui::ComboBox::from_label("Feeling filter")
                .selected_text(current.map_or("All feelings", |m| m.name()))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut chosen, None, "All feelings");
                    for mood in MoodState::all() {
                        ui.selectable_value(&mut chosen, Some(mood), mood.name());
                    }
                });
            if chosen != current {
                action = Some(UiAction::SetMoodFilter(chosen));
            }

            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(format!(
                    "{} nodes, {} links, {} matching days",
                    snapshot.graph.nodes.len(),
                    snapshot.graph.edges.len(),
                    snapshot.graph.passing_days.len()
                ))
                .color(theme::text::MUTED),
            );
        }

        if let Some(report) = &self.load_report {
            let span = self.engine.as_ref().map(|engine| {
                let dataset = engine.dataset();
                match (dataset.first_day(), dataset.last_day()) {
                    (Some(first), Some(last)) if !dataset.is_empty() => {
                        format!("Entries from {} to {}", first.format("%b %d, %Y"), last.format("%b %d, %Y"))
                    }
                    _ => "The journal is empty".to_string(),
                }
            });
            ui.separator();
            egui::CollapsingHeader::new("Data").default_open(false).show(ui, |ui| {
                if let Some(span) = &span {
                    ui.label(span);
                }
                ui.label(format!("{} records over {} days", report.records, report.days));
                ui.label(format!("{} days with mood and sleep", report.stats_days));
                if report.skipped_records > 0 {
                    ui.colored_label(
                        theme::state::WARNING,
                        format!("{} records skipped", report.skipped_records),
                    );
                }
                if report.days_without_stats > 0 {
                    ui.colored_label(
                        theme::state::WARNING,
                        format!("{} days have no mood or sleep entry", report.days_without_stats),
                    );
                }
                ui.colored_label(theme::state::SUCCESS, format!("Loaded in {} ms", report.load_time_ms));
            });
        }

        ui.separator();
        egui::CollapsingHeader::new("Layout").default_open(true).show(ui, |ui| {
            let mut changed = false;
            changed |= ui.checkbox(&mut self.physics_enabled, "Physics").changed();
            changed |= ui
                .add(egui::Slider::new(&mut self.layout.repulsion, 100.0..=10000.0).text("Repulsion"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut self.layout.attraction, 0.001..=0.3).text("Attraction"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut self.layout.link_distance, 20.0..=400.0).text("Link distance"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut self.node_scale, 200.0..=5000.0).text("Node size"))
                .changed();
            changed |= ui.checkbox(&mut self.show_labels, "Labels").changed();
            if self.show_labels {
                changed |= ui
                    .add(egui::Slider::new(&mut self.label_size, 6.0..=20.0).text("Label size"))
                    .changed();
            }
            if ui.button("Reset view").clicked() {
                self.pan_offset = Vec2::ZERO;
                self.zoom = 1.0;
            }
            if changed {
                self.mark_settings_dirty();
            }
        });

        if let Some(action) = action {
            self.apply(action);
        }
    }

    fn render_graph(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        let center = rect.center();

        let Some(engine) = self.engine.as_ref() else {
            let text = if self.load_receiver.is_some() { "Loading..." } else { "No data" };
            painter.text(center, Align2::CENTER_CENTER, text, FontId::proportional(16.0), theme::text::MUTED);
            return;
        };
        let snapshot = engine.snapshot();
        let graph = &snapshot.graph;

        if graph.is_empty() {
            painter.text(
                center,
                Align2::CENTER_CENTER,
                "No entries match the selected range",
                FontId::proportional(16.0),
                theme::text::MUTED,
            );
        }

        // Gather all input deltas first (allows simultaneous pan+zoom on trackpad)
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
        let zoom_delta = ui.input(|i| i.zoom_delta());

        if response.dragged_by(egui::PointerButton::Primary) {
            self.pan_offset += response.drag_delta();
        }
        if scroll_delta != Vec2::ZERO && response.hovered() {
            self.pan_offset += scroll_delta;
        }
        if let Some(cursor_pos) = response.hover_pos() {
            if zoom_delta != 1.0 {
                let new_zoom = (self.zoom * zoom_delta).clamp(0.1, 5.0);
                let cursor_offset = cursor_pos - center - self.pan_offset;
                self.pan_offset += cursor_offset * (1.0 - new_zoom / self.zoom);
                self.zoom = new_zoom;
            }
        }

        self.layout_state.sync(graph, Rect::from_center_size(center, rect.size() * 0.6));
        if self.physics_enabled {
            self.layout.step(&mut self.layout_state, graph, center);
        }

        let pan_offset = self.pan_offset;
        let zoom = self.zoom;
        let transform = |pos: Pos2| -> Pos2 { center + (pos - center) * zoom + pan_offset };

        // Links: plain ones first, highlighted on top
        for highlighted in [false, true] {
            for pair in graph.edges.keys() {
                if snapshot.is_highlighted(pair) != highlighted {
                    continue;
                }
                let (Some(a), Some(b)) = (
                    self.layout_state.position(pair.low()),
                    self.layout_state.position(pair.high()),
                ) else {
                    continue;
                };
                let stroke = if highlighted {
                    theme::stroke(theme::graph::LINK_HIGHLIGHT, theme::graph::LINK_HIGHLIGHT_WIDTH)
                } else {
                    theme::stroke(theme::graph::LINK, theme::graph::LINK_WIDTH)
                };
                painter.line_segment([transform(a), transform(b)], stroke);
            }
        }

        // Hover: the node under the cursor, if any
        let mut hovered = None;
        if let Some(hover_pos) = response.hover_pos() {
            let mut closest: Option<(&ItemId, f32)> = None;
            for id in &graph.nodes {
                let Some(pos) = self.layout_state.position(id) else {
                    continue;
                };
                let radius = node_radius(graph.node_share(id), self.node_scale) * zoom;
                let distance = transform(pos).distance(hover_pos);
                if distance <= radius.max(4.0) && closest.map_or(true, |(_, d)| distance < d) {
                    closest = Some((id, distance));
                }
            }
            hovered = closest.map(|(id, _)| id.clone());
        }

        let selected = snapshot.selection.selected_node();
        for id in &graph.nodes {
            let Some(pos) = self.layout_state.position(id) else {
                continue;
            };
            let screen = transform(pos);
            let radius = node_radius(graph.node_share(id), self.node_scale) * zoom;
            let fill = if selected == Some(id.as_str()) {
                theme::graph::SELECTED_NODE
            } else {
                graph.mood_of(id).map_or(theme::graph::UNCOLORED_NODE, |m| m.color())
            };
            let stroke = if hovered.as_deref() == Some(id.as_str()) {
                Stroke::new(2.0, Color32::WHITE)
            } else {
                Stroke::NONE
            };
            draw_node(&painter, graph.kind(id).unwrap_or(ItemType::Context), screen, radius, fill, stroke);

            if self.show_labels {
                painter.text(
                    screen + Vec2::new(radius + 3.0, 0.0),
                    Align2::LEFT_CENTER,
                    id,
                    FontId::proportional(self.label_size * zoom.clamp(0.5, 2.0)),
                    theme::text::SECONDARY,
                );
            }
        }

        if let (Some(id), Some(hover_pos)) = (&hovered, response.hover_pos()) {
            let mood = graph.mood_of(id).map_or("no mood", |m| m.name());
            let kind = graph.kind(id).unwrap_or(ItemType::Context);
            painter.text(
                hover_pos + Vec2::new(12.0, -12.0),
                Align2::LEFT_BOTTOM,
                format!("{} ({}): {} days, mostly {}", id, kind.label(), graph.frequency_of(id), mood),
                FontId::proportional(12.0),
                theme::text::PRIMARY,
            );
        }

        let settled = self.layout.is_settled(&self.layout_state);
        let clicked = if response.clicked() { hovered } else { None };

        if self.physics_enabled && !settled {
            ui.ctx().request_repaint();
        }
        if let Some(id) = clicked {
            self.apply(UiAction::ClickNode(id));
        }
    }

    fn render_charts(&mut self, ui: &mut egui::Ui) {
        let Some(engine) = self.engine.as_ref() else {
            ui.label("No data");
            return;
        };
        let snapshot = engine.snapshot();

        ui.heading("Sleep");
        let histogram = &snapshot.histogram;
        if histogram.is_empty() {
            ui.label(egui::RichText::new("No sleep entries in range").color(theme::text::MUTED));
        } else {
            let bars: Vec<Bar> = histogram
                .bins
                .iter()
                .map(|bin| {
                    Bar::new((bin.lo + bin.hi) / 2.0, bin.count as f64)
                        .width(bin.hi - bin.lo)
                        .name(format!("{:.1}–{:.1} h", bin.lo, bin.hi))
                })
                .collect();
            let chart = BarChart::new(bars).color(theme::chart::HISTOGRAM_BAR).name("Days");
            Plot::new("sleep_histogram")
                .height(180.0)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .allow_boxed_zoom(false)
                .x_axis_label("Hours slept")
                .y_axis_label("Days")
                .include_y(0.0)
                .include_y(histogram.max_count() as f64 + 1.0)
                .show(ui, |plot_ui| plot_ui.bar_chart(chart));
        }
        ui.label(
            egui::RichText::new(format!("{} nights", snapshot.sleep_durations.len())).color(theme::text::MUTED),
        );

        ui.add_space(12.0);
        ui.heading("Feelings");
        let slices = pie_slices(&snapshot.mood_counts);
        let selected_mood = snapshot.selection.selected_mood();

        let size = ui.available_width().min(260.0);
        let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::click());
        let center = response.rect.center();
        let outer = size / 2.0 - 8.0;
        let inner = outer * 0.5;

        if slices.is_empty() {
            painter.text(
                center,
                Align2::CENTER_CENTER,
                "No mood entries",
                FontId::proportional(13.0),
                theme::text::MUTED,
            );
        }

        let mut start = 0.0;
        for slice in &slices {
            let sweep = slice.fraction * TAU;
            let (ring_inner, ring_outer) = if selected_mood == Some(slice.mood) {
                (inner, outer + 6.0)
            } else {
                (inner, outer)
            };
            paint_ring_segment(&painter, center, ring_inner, ring_outer, start, start + sweep, slice.mood.color());
            if selected_mood == Some(slice.mood) {
                let steps = ((sweep / 0.08).ceil() as usize).max(1);
                let arc: Vec<Pos2> = (0..=steps)
                    .map(|i| polar(center, ring_outer, start + sweep * i as f32 / steps as f32))
                    .collect();
                painter.add(Shape::line(arc, Stroke::new(2.0, theme::chart::SLICE_SELECTED)));
            }

            // Slice borders
            for angle in [start, start + sweep] {
                painter.line_segment(
                    [polar(center, ring_inner, angle), polar(center, ring_outer, angle)],
                    Stroke::new(2.0, theme::chart::SLICE_BORDER),
                );
            }
            if slice.fraction >= 0.06 {
                painter.text(
                    polar(center, (ring_inner + ring_outer) / 2.0, start + sweep / 2.0),
                    Align2::CENTER_CENTER,
                    slice.mood.short_label(),
                    FontId::proportional(11.0),
                    Color32::BLACK,
                );
            }
            start += sweep;
        }

        let mut action = None;
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let delta = pos - center;
                let r = delta.length();
                if r >= inner && r <= outer + 6.0 {
                    if let Some(mood) = slice_at(&slices, angle_from_top(delta)) {
                        action = Some(UiAction::ClickMood(mood));
                    }
                }
            }
        }

        // Legend
        for mood in MoodState::all() {
            let count = snapshot.mood_counts.get(&mood).copied().unwrap_or(0);
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::splat(10.0), Sense::hover());
                ui.painter().rect_filled(rect, 2.0, mood.color());
                let text = egui::RichText::new(format!("{} ({})", mood.name(), count));
                if count == 0 {
                    ui.label(text.color(theme::text::MUTED));
                } else if selected_mood == Some(mood) {
                    ui.label(text.strong());
                } else {
                    ui.label(text);
                }
            });
        }

        if let Some(action) = action {
            self.apply(action);
        }
    }

    fn render_timeline(&mut self, ui: &mut egui::Ui) {
        let Some(range) = self.range.as_mut() else {
            ui.label("No dates loaded");
            return;
        };

        ui.horizontal(|ui| {
            ui.label(format!("Showing: {} → {}", range.start, range.end));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("{} days", range.day_span()));
            });
        });
        ui.add_space(4.0);

        let (response, painter) = ui.allocate_painter(Vec2::new(ui.available_width(), 36.0), Sense::click_and_drag());
        let track = response.rect.shrink2(Vec2::new(10.0, 8.0));
        if track.width() <= 0.0 {
            return;
        }
        let to_pos = |x: f32| ((x - track.left()) / track.width()).clamp(0.0, 1.0);
        let to_x = |pos: f32| track.left() + pos * track.width();

        if response.drag_started() {
            if let Some(p) = response.interact_pointer_pos() {
                range.dragging = range.pick_handle(to_pos(p.x), 12.0 / track.width());
            }
        }
        if response.dragged() {
            if let (Some(handle), Some(p)) = (range.dragging, response.interact_pointer_pos()) {
                range.drag(handle, to_pos(p.x));
            }
        }
        let mut action = None;
        if response.drag_stopped() {
            if let Some((start, end)) = range.finish_drag() {
                action = Some(UiAction::SetRange(start, end));
            }
        }

        painter.rect_filled(track, 4.0, theme::bg::TIMELINE_TRACK);

        // One notch per day, taller at month starts
        for day in range.days() {
            let x = to_x(range.position_of(day));
            let month_start = day.day() == 1;
            let inset = if month_start { 0.0 } else { track.height() * 0.35 };
            painter.line_segment(
                [Pos2::new(x, track.top() + inset), Pos2::new(x, track.bottom() - inset)],
                Stroke::new(1.0, theme::timeline::NOTCH),
            );
            if month_start {
                painter.text(
                    Pos2::new(x + 3.0, track.top()),
                    Align2::LEFT_TOP,
                    day.format("%b").to_string(),
                    FontId::proportional(10.0),
                    theme::text::PRIMARY,
                );
            }
        }

        let start_x = to_x(range.position_of(range.start));
        let end_x = to_x(range.position_of(range.end));
        painter.rect_filled(
            Rect::from_min_max(
                Pos2::new(start_x, track.center().y - 3.0),
                Pos2::new(end_x, track.center().y + 3.0),
            ),
            2.0,
            theme::timeline::RANGE,
        );
        painter.circle_filled(Pos2::new(start_x, track.center().y), 7.0, theme::timeline::HANDLE_START);
        painter.circle_filled(Pos2::new(end_x, track.center().y), 7.0, theme::timeline::HANDLE_END);

        if range.dragging.is_some() {
            ui.ctx().request_repaint();
        }
        if let Some(action) = action {
            self.apply(action);
        }
    }
}

impl eframe::App for FeelvizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load(ctx);
        self.maybe_save_settings();

        ctx.set_visuals(egui::Visuals::dark());

        egui::SidePanel::left("sidebar")
            .min_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.render_sidebar(ui);
                });
            });

        egui::SidePanel::right("charts")
            .min_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.render_charts(ui);
                });
            });

        egui::TopBottomPanel::bottom("timeline")
            .min_height(72.0)
            .frame(egui::Frame::none()
                .fill(theme::bg::PANEL)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0)))
            .show(ctx, |ui| {
                self.render_timeline(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(theme::bg::GRAPH))
            .show(ctx, |ui| {
                self.render_graph(ui);
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Force save settings on exit
        if self.settings_dirty {
            self.sync_settings_from_ui();
            self.settings.save();
        }
    }
}

/// Radius whose circle area is `scale * share`
fn node_radius(share: f32, scale: f32) -> f32 {
    (scale * share / PI).sqrt().max(3.0)
}

fn draw_node(painter: &egui::Painter, kind: ItemType, pos: Pos2, radius: f32, fill: Color32, stroke: Stroke) {
    match kind {
        ItemType::Context => {
            painter.circle(pos, radius, fill, stroke);
        }
        ItemType::Description => {
            let side = radius * PI.sqrt();
            painter.rect(Rect::from_center_size(pos, Vec2::splat(side)), 0.0, fill, stroke);
        }
        ItemType::Association => {
            let points = star_points(pos, radius * 1.3, radius * 0.55);
            // Star is concave: fill as a fan of triangles
            for i in 0..points.len() {
                let next = points[(i + 1) % points.len()];
                painter.add(Shape::convex_polygon(vec![pos, points[i], next], fill, Stroke::NONE));
            }
            if stroke != Stroke::NONE {
                painter.add(Shape::closed_line(points, stroke));
            }
        }
    }
}

/// Outline of a five-pointed star, alternating outer and inner corners
fn star_points(center: Pos2, outer: f32, inner: f32) -> Vec<Pos2> {
    (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            polar(center, r, i as f32 * PI / 5.0)
        })
        .collect()
}

/// Point at `angle` radians clockwise from twelve o'clock
fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    let a = angle - FRAC_PI_2;
    center + Vec2::new(a.cos(), a.sin()) * radius
}

/// Clockwise angle from twelve o'clock, in [0, TAU)
fn angle_from_top(delta: Vec2) -> f32 {
    (delta.y.atan2(delta.x) + FRAC_PI_2).rem_euclid(TAU)
}

/// Slice covering `angle`, with slices laid out clockwise from the top
fn slice_at(slices: &[PieSlice], angle: f32) -> Option<MoodState> {
    let mut start = 0.0;
    for slice in slices {
        let end = start + slice.fraction * TAU;
        if angle >= start && angle < end {
            return Some(slice.mood);
        }
        start = end;
    }
    slices.last().filter(|_| angle >= start - 1e-4).map(|s| s.mood)
}

/// Donut segment drawn as convex quads
fn paint_ring_segment(
    painter: &egui::Painter,
    center: Pos2,
    inner: f32,
    outer: f32,
    start: f32,
    end: f32,
    fill: Color32,
) {
    let steps = ((end - start) / 0.08).ceil().max(1.0) as usize;
    let step = (end - start) / steps as f32;
    for i in 0..steps {
        let a0 = start + step * i as f32;
        let a1 = a0 + step;
        painter.add(Shape::convex_polygon(
            vec![
                polar(center, inner, a0),
                polar(center, outer, a0),
                polar(center, outer, a1),
                polar(center, inner, a1),
            ],
            fill,
            Stroke::NONE,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mood(v: i64) -> MoodState {
        MoodState::new(v).unwrap()
    }

    #[test]
    fn node_area_tracks_share() {
        let r = node_radius(0.5, 1500.0);
        assert!((PI * r * r - 750.0).abs() < 1e-2);
        assert_eq!(node_radius(0.0, 1500.0), 3.0);
    }

    #[test]
    fn slices_are_hit_clockwise_from_top() {
        let slices = vec![
            PieSlice { mood: mood(-1), count: 1, fraction: 0.25 },
            PieSlice { mood: mood(2), count: 3, fraction: 0.75 },
        ];
        // Right of center is a quarter turn clockwise from the top
        assert_eq!(slice_at(&slices, angle_from_top(Vec2::new(1.0, -1.0))), Some(mood(-1)));
        assert_eq!(slice_at(&slices, angle_from_top(Vec2::new(0.0, 1.0))), Some(mood(2)));
        assert_eq!(slice_at(&slices, angle_from_top(Vec2::new(-1.0, -1.0))), Some(mood(2)));
        assert_eq!(slice_at(&[], 1.0), None);
    }

    #[test]
    fn polar_starts_at_twelve_o_clock() {
        let p = polar(Pos2::ZERO, 10.0, 0.0);
        assert!(p.x.abs() < 1e-4 && (p.y + 10.0).abs() < 1e-4);
        assert_eq!(star_points(Pos2::ZERO, 10.0, 4.0).len(), 10);
    }
}
