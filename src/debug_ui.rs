// Slice preview collector + viewer.
//
// Callers drop in `add_*()` calls while building a job and a single `show()` at the end to
// inspect everything: the design with its cut lines, footer zone and block overlays, and
// each initial slice on its own. Cut lines edited in the design view come back from `show()`.
//
// When the `debug_ui` feature is disabled (or `cli_only` is enabled), all APIs in this
// module become no-ops.

#[cfg(all(feature = "debug_ui", not(feature = "cli_only")))]
mod imp {
    use crate::cut_lines::CutLineSet;
    use crate::desc::LineId;
    use crate::im::RGBAIm;
    use crate::overlay::{Block, ScreenRect, hit_test, project_overlay, project_regions};
    use crate::scale::{Dims, ScaleTracker, rendered_dims};
    use eframe::egui;
    use std::sync::{Mutex, OnceLock};

    const GRAB_DIST_PX: f32 = 6.0;

    #[derive(Clone, Debug)]
    struct DebugImageData {
        title: String,
        im: RGBAIm,
    }

    #[derive(Clone, Debug)]
    struct SlicePreviewData {
        title: String,
        src: RGBAIm,
        cut_lines: CutLineSet,
        blocks: Vec<Block>,
        analyzed: Dims,
    }

    #[derive(Clone, Debug)]
    enum DebugItemData {
        Image(DebugImageData),
        SlicePreview(SlicePreviewData),
    }

    #[derive(Default)]
    struct DebugUiState {
        title: String,
        items: Vec<DebugItemData>,
        edited: Option<CutLineSet>,
    }

    fn global_state() -> &'static Mutex<DebugUiState> {
        static G: OnceLock<Mutex<DebugUiState>> = OnceLock::new();
        G.get_or_init(|| {
            Mutex::new(DebugUiState {
                title: "mailslice preview".to_owned(),
                items: Vec::new(),
                edited: None,
            })
        })
    }

    fn push_item(item: DebugItemData) {
        // A poisoned collector only means an earlier add panicked; keep collecting.
        let mut g = global_state().lock().unwrap_or_else(|e| e.into_inner());
        g.items.push(item);
    }

    fn publish_edit(cut_lines: &CutLineSet) {
        let mut g = global_state().lock().unwrap_or_else(|e| e.into_inner());
        g.edited = Some(cut_lines.clone());
    }

    fn to_color_image(im: &RGBAIm) -> egui::ColorImage {
        let mut packed: Vec<u8> = Vec::with_capacity(im.w * im.h * 4);
        for y in 0..im.h {
            packed.extend_from_slice(im.row(y));
        }
        egui::ColorImage::from_rgba_unmultiplied([im.w, im.h], &packed)
    }

    fn to_egui_rect(origin: egui::Pos2, r: &ScreenRect) -> egui::Rect {
        egui::Rect::from_min_size(
            origin + egui::vec2(r.left as f32, r.top as f32),
            egui::vec2(r.width as f32, r.height as f32),
        )
    }

    // Public API (collector)
    // -------------------------------------------------------------------------

    pub fn init(title: &str) {
        let mut g = global_state().lock().unwrap_or_else(|e| e.into_inner());
        g.title = title.to_owned();
        g.items.clear();
        g.edited = None;
    }

    pub fn add_rgba(title: &str, im: &RGBAIm) {
        push_item(DebugItemData::Image(DebugImageData {
            title: title.to_owned(),
            im: im.clone(),
        }));
    }

    /// The design with its editable geometry. `analyzed` is what `blocks` were measured
    /// against; pass `None` to use the image's natural size.
    pub fn add_slice_preview(
        title: &str,
        src: &RGBAIm,
        cut_lines: &CutLineSet,
        blocks: &[Block],
        analyzed: Option<Dims>,
    ) {
        let analyzed = analyzed.unwrap_or(Dims::new(src.w as f64, src.h as f64));
        push_item(DebugItemData::SlicePreview(SlicePreviewData {
            title: title.to_owned(),
            src: src.clone(),
            cut_lines: cut_lines.clone(),
            blocks: blocks.to_vec(),
            analyzed,
        }));
    }

    /// Open the window and block until it closes. Returns the design view's cut lines if they
    /// were edited.
    pub fn show() -> Result<Option<CutLineSet>, String> {
        let (title, items) = {
            let mut g = global_state().lock().unwrap_or_else(|e| e.into_inner());
            let title = g.title.clone();
            let items = std::mem::take(&mut g.items);
            (title, items)
        };

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size(egui::vec2(1200.0, 800.0)),
            ..Default::default()
        };
        let window_title = title.clone();

        eframe::run_native(
            &window_title,
            options,
            Box::new(move |_cc| Ok(Box::new(DebugUiApp::new(&title, items)))),
        )
        .map_err(|e| e.to_string())?;

        Ok(take_edited())
    }

    fn take_edited() -> Option<CutLineSet> {
        let mut g = global_state().lock().unwrap_or_else(|e| e.into_inner());
        g.edited.take()
    }

    // App shell
    // -------------------------------------------------------------------------

    struct DebugUiApp {
        title: String,
        items: Vec<DebugItem>,
        selected: usize,
    }

    enum DebugItem {
        Image(ImageViewer),
        SlicePreview(SlicePreviewViewer),
    }

    impl DebugUiApp {
        fn new(title: &str, items: Vec<DebugItemData>) -> Self {
            let items = items
                .into_iter()
                .map(|it| match it {
                    DebugItemData::Image(d) => DebugItem::Image(ImageViewer::new(&d.title, d.im)),
                    DebugItemData::SlicePreview(d) => DebugItem::SlicePreview(SlicePreviewViewer::new(d)),
                })
                .collect();

            Self {
                title: title.to_owned(),
                items,
                selected: 0,
            }
        }

        fn item_titles(&self) -> Vec<String> {
            self.items
                .iter()
                .map(|it| match it {
                    DebugItem::Image(v) => format!("img: {}", v.title),
                    DebugItem::SlicePreview(v) => format!("design: {}", v.title),
                })
                .collect()
        }

        fn selected_item_mut(&mut self) -> Option<&mut DebugItem> {
            let last = self.items.len().checked_sub(1)?;
            self.items.get_mut(self.selected.min(last))
        }
    }

    impl eframe::App for DebugUiApp {
        fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
            egui::TopBottomPanel::top("top").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(&self.title);
                    ui.separator();
                    ui.monospace(format!("items={}", self.items.len()));
                });
            });

            egui::SidePanel::left("left")
                .resizable(true)
                .default_width(260.0)
                .show(ctx, |ui| {
                    ui.heading("Items");
                    ui.separator();

                    if self.items.is_empty() {
                        ui.label("Nothing collected.");
                        return;
                    }

                    let titles = self.item_titles();
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            for (i, t) in titles.iter().enumerate() {
                                if ui.selectable_label(i == self.selected, t).clicked() {
                                    self.selected = i;
                                }
                            }
                        });
                });

            egui::CentralPanel::default().show(ctx, |ui| {
                let Some(item) = self.selected_item_mut() else {
                    ui.label("No selection");
                    return;
                };

                match item {
                    DebugItem::Image(v) => v.ui(ctx, ui),
                    DebugItem::SlicePreview(v) => v.ui(ctx, ui),
                }
            });
        }
    }

    // Plain image viewer (one per produced slice)
    // -------------------------------------------------------------------------

    struct ImageViewer {
        title: String,
        im: RGBAIm,
        texture: Option<egui::TextureHandle>,
        hover_text: String,
    }

    impl ImageViewer {
        fn new(title: &str, im: RGBAIm) -> Self {
            Self {
                title: title.to_owned(),
                im,
                texture: None,
                hover_text: String::new(),
            }
        }

        fn ui(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
            if self.im.is_empty() {
                ui.label(format!("{}: empty slice", self.title));
                return;
            }

            let tex = self.texture.get_or_insert_with(|| {
                ctx.load_texture("slice_image", to_color_image(&self.im), egui::TextureOptions::NEAREST)
            });
            let tex_id = tex.id();

            ui.horizontal(|ui| {
                ui.label(&self.title);
                ui.separator();
                ui.monospace(format!("{}x{}", self.im.w, self.im.h));
                if !self.hover_text.is_empty() {
                    ui.separator();
                    ui.monospace(&self.hover_text);
                }
            });

            let image_size = egui::vec2(self.im.w as f32, self.im.h as f32);
            egui::ScrollArea::both().show(ui, |ui| {
                let response = ui.add(egui::Image::new((tex_id, image_size)));
                if let Some(pos) = response.hover_pos() {
                    let x = (pos.x - response.rect.left()).max(0.0) as usize;
                    let y = (pos.y - response.rect.top()).max(0.0) as usize;
                    if let Some([r, g, b, a]) = self.im.pixel(x, y) {
                        self.hover_text = format!("x={x} y={y} rgba8({r},{g},{b},{a})");
                    }
                }
            });
        }
    }

    // Design preview: cut lines, footer zone, block overlays
    // -------------------------------------------------------------------------

    struct SlicePreviewViewer {
        title: String,
        src: RGBAIm,
        cut_lines: CutLineSet,
        published: CutLineSet,
        blocks: Vec<Block>,
        tracker: ScaleTracker,
        zoom: f32,
        texture: Option<egui::TextureHandle>,
        selected_block: Option<usize>,
        grabbed_line: Option<LineId>,
        cmd: String,
        status: String,
    }

    impl SlicePreviewViewer {
        fn new(d: SlicePreviewData) -> Self {
            Self {
                title: d.title,
                src: d.src,
                published: d.cut_lines.clone(),
                cut_lines: d.cut_lines,
                blocks: d.blocks,
                tracker: ScaleTracker::new(d.analyzed),
                zoom: 1.0,
                texture: None,
                selected_block: None,
                grabbed_line: None,
                cmd: String::new(),
                status: HELP.to_owned(),
            }
        }

        /// Screen y -> percent of the rendered image height.
        fn pct_at(&self, y_screen: f32, image_rect: egui::Rect) -> f64 {
            let fy = ((y_screen - image_rect.top()) / image_rect.height()).clamp(0.0, 1.0);
            fy as f64 * 100.0
        }

        fn nearest_line(&self, y_screen: f32, image_rect: egui::Rect) -> Option<LineId> {
            self.cut_lines
                .lines()
                .iter()
                .map(|l| {
                    let ly = image_rect.top() + image_rect.height() * (l.pct as f32 / 100.0);
                    (l.id, (ly - y_screen).abs())
                })
                .filter(|(_, d)| *d <= GRAB_DIST_PX)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(id, _)| id)
        }

        fn apply_cmd(&mut self, line: &str) {
            let mut it = line.split_whitespace();
            let Some(cmd) = it.next() else {
                return;
            };

            let pct_arg = |s: Option<&str>| s.and_then(|v| v.parse::<f64>().ok()).filter(|v| v.is_finite());

            self.status = match cmd {
                "zoom" => match it.next().and_then(|v| v.parse::<f32>().ok()) {
                    Some(z) if z.is_finite() && z > 0.0 => {
                        self.zoom = z;
                        format!("zoom={z}")
                    }
                    _ => "usage: zoom <f32 > 0>".to_owned(),
                },
                "fit" => {
                    self.zoom = 1.0;
                    "zoom=1 (fit width)".to_owned()
                }
                "add" => match pct_arg(it.next()) {
                    Some(pct) => match self.cut_lines.add(pct) {
                        Ok(id) => format!("added {id} at {pct:.2}%"),
                        Err(e) => e.to_string(),
                    },
                    None => "usage: add <pct>".to_owned(),
                },
                "rm" => match it.next().and_then(|v| v.parse::<u32>().ok()) {
                    Some(id) => match self.cut_lines.remove(LineId(id)) {
                        Ok(l) => format!("removed {} at {:.2}%", l.id, l.pct),
                        Err(e) => e.to_string(),
                    },
                    None => "usage: rm <line id>".to_owned(),
                },
                "clear" => {
                    self.cut_lines.clear();
                    "cleared cut lines".to_owned()
                }
                "footer" => match pct_arg(it.next()) {
                    Some(pct) => {
                        let dropped = self.cut_lines.set_footer(pct);
                        format!(
                            "footer={:.2}% dropped={}",
                            self.cut_lines.footer_pct(),
                            dropped.len()
                        )
                    }
                    None => "usage: footer <pct>".to_owned(),
                },
                "help" => HELP.to_owned(),
                _ => format!("unknown cmd: {cmd} (try `help`)"),
            };
        }

        fn paint_overlays(&self, painter: &egui::Painter, image_rect: egui::Rect, scale: f64) {
            let origin = image_rect.min;
            let natural_w = self.src.w as u32;

            // Slices as alternating tinted bands; the builder works in natural pixels so the
            // regions use the natural->screen ratio, not the analyzed one.
            let natural_scale = image_rect.height() as f64 / (self.src.h.max(1) as f64);
            let regions = self.cut_lines.regions(self.src.h as u32);
            let bands = project_regions(&regions, natural_w, natural_scale);
            for (i, band) in bands.iter().enumerate() {
                let tint = if i % 2 == 0 {
                    egui::Color32::from_rgba_unmultiplied(40, 160, 255, 24)
                } else {
                    egui::Color32::from_rgba_unmultiplied(255, 160, 40, 24)
                };
                painter.rect_filled(to_egui_rect(origin, band), 0.0, tint);
            }

            let footer_y = image_rect.top() + image_rect.height() * (self.cut_lines.footer_pct() as f32 / 100.0);
            if footer_y < image_rect.bottom() {
                let footer = egui::Rect::from_min_max(egui::pos2(image_rect.left(), footer_y), image_rect.max);
                painter.rect_filled(footer, 0.0, egui::Color32::from_black_alpha(140));
            }

            for l in self.cut_lines.lines() {
                let y = image_rect.top() + image_rect.height() * (l.pct as f32 / 100.0);
                let width = if Some(l.id) == self.grabbed_line { 3.0 } else { 1.5 };
                painter.line_segment(
                    [egui::pos2(image_rect.left(), y), egui::pos2(image_rect.right(), y)],
                    egui::Stroke::new(width, egui::Color32::from_rgb(255, 40, 40)),
                );
            }

            for (i, rect) in project_overlay(&self.blocks, scale).iter().enumerate() {
                let color = if Some(i) == self.selected_block {
                    egui::Color32::from_rgb(40, 255, 40)
                } else {
                    egui::Color32::from_rgb(40, 120, 255)
                };
                painter.rect_stroke(
                    to_egui_rect(origin, rect),
                    0.0,
                    egui::Stroke::new(1.5, color),
                    egui::StrokeKind::Inside,
                );
            }
        }

        fn ui(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
            if self.src.is_empty() {
                ui.label(format!("{}: image not loaded", self.title));
                return;
            }

            let tex = self.texture.get_or_insert_with(|| {
                ctx.load_texture("slice_preview", to_color_image(&self.src), egui::TextureOptions::LINEAR)
            });
            let tex_id = tex.id();

            ui.horizontal(|ui| {
                ui.label(&self.title);
                ui.separator();
                ui.monospace(format!(
                    "zoom={:.2} scale={:.4} cuts={} footer={:.1}%",
                    self.zoom,
                    self.tracker.scale(),
                    self.cut_lines.len(),
                    self.cut_lines.footer_pct()
                ));
                if let Some(block) = self.selected_block.and_then(|i| self.blocks.get(i)) {
                    ui.separator();
                    ui.monospace(format!("selected={}", block.id));
                }
            });

            let container_w = ui.available_width() as f64;
            let natural = Dims::new(self.src.w as f64, self.src.h as f64);
            let rendered = rendered_dims(container_w, self.zoom as f64, natural);
            if let Some(scale) = self.tracker.observe(rendered) {
                tracing::debug!(scale, "preview rescaled");
            }
            let scale = self.tracker.scale();

            egui::ScrollArea::both().max_height((ui.available_height() - 60.0).max(100.0)).show(ui, |ui| {
                let size = egui::vec2(rendered.w as f32, rendered.h as f32);
                let (image_rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
                let painter = ui.painter_at(image_rect);
                painter.image(
                    tex_id,
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );

                if response.drag_started() {
                    self.grabbed_line = response
                        .interact_pointer_pos()
                        .and_then(|pos| self.nearest_line(pos.y, image_rect));
                }
                if response.dragged() {
                    if let (Some(id), Some(pos)) = (self.grabbed_line, response.interact_pointer_pos()) {
                        let pct = self.pct_at(pos.y, image_rect);
                        if let Err(e) = self.cut_lines.move_line(id, pct) {
                            self.status = e.to_string();
                        }
                    }
                }
                if response.drag_stopped() {
                    self.grabbed_line = None;
                }

                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        let rects = project_overlay(&self.blocks, scale);
                        let local = pos - image_rect.min;
                        self.selected_block = hit_test(&rects, local.x as f64, local.y as f64);
                    }
                }

                self.paint_overlays(&painter, image_rect, scale);
            });

            ui.separator();
            ui.horizontal(|ui| {
                ui.monospace("cmd>");
                let resp = ui.add(
                    egui::TextEdit::singleline(&mut self.cmd)
                        .desired_width(f32::INFINITY)
                        .hint_text("add 30 | footer 90 | zoom 2"),
                );

                if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    let line = self.cmd.trim().to_owned();
                    self.cmd.clear();
                    self.apply_cmd(&line);
                }
            });
            if !self.status.is_empty() {
                ui.monospace(&self.status);
            }

            if self.cut_lines != self.published {
                publish_edit(&self.cut_lines);
                self.published = self.cut_lines.clone();
            }
        }
    }

    const HELP: &str = "cmd: add <pct> | rm <id> | clear | footer <pct> | zoom <f32> | fit | help  (drag red lines, click boxes)";

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn edits_made_in_the_design_view_are_handed_back_once() {
            init("test");
            assert!(take_edited().is_none());

            let mut edited = CutLineSet::default();
            edited.add(40.0).unwrap();
            publish_edit(&edited);

            assert_eq!(take_edited(), Some(edited));
            assert!(take_edited().is_none());

            publish_edit(&CutLineSet::default());
            init("again");
            assert!(take_edited().is_none(), "init forgets stale edits");
        }
    }
}

/// No-op implementations when debug_ui feature is disabled or cli_only is enabled.
#[cfg(not(all(feature = "debug_ui", not(feature = "cli_only"))))]
mod imp {
    use crate::cut_lines::CutLineSet;
    use crate::im::RGBAIm;
    use crate::overlay::Block;
    use crate::scale::Dims;

    pub fn init(_title: &str) {}

    pub fn add_rgba(_title: &str, _im: &RGBAIm) {}

    pub fn add_slice_preview(
        _title: &str,
        _src: &RGBAIm,
        _cut_lines: &CutLineSet,
        _blocks: &[Block],
        _analyzed: Option<Dims>,
    ) {
    }

    pub fn show() -> Result<Option<CutLineSet>, String> {
        Ok(None)
    }
}

pub use imp::*;
