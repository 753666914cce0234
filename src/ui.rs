//! eframe window around [`AppState`]
//!
//! Left: loaded documents and actions. Centre: the page with selections drawn
//! over it. Bottom: the selection table. Right: extracted text preview.

use crate::app::{AppState, Notice, PageKey, Severity};
use crate::export;
use crate::geometry::{Point, Rect};
use crate::table::RecordId;
use crate::workspace::DocumentId;
use eframe::egui;
use std::collections::VecDeque;
use std::path::PathBuf;

const APP_TITLE: &str = "PDF Region Extractor";

const SELECTION_COLOR: egui::Color32 = egui::Color32::RED;
const DRAG_COLOR: egui::Color32 = egui::Color32::from_rgb(30, 100, 230);

/// Open the main window and block until it is closed
pub fn run(state: AppState) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title(APP_TITLE)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(RegionApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("window closed with an error: {}", e))
}

/// The page on screen, uploaded to the GPU
struct PageTexture {
    key: PageKey,
    handle: egui::TextureHandle,
}

pub struct RegionApp {
    state: AppState,
    texture: Option<PageTexture>,
    notices: VecDeque<Notice>,
}

impl RegionApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            texture: None,
            notices: VecDeque::new(),
        }
    }

    fn open_files(&mut self) {
        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf", "PDF"])
            .pick_files()
        {
            self.state.open_paths(paths);
        }
    }

    fn open_folder(&mut self) {
        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
            self.state.open_folder(&dir);
        }
    }

    fn export(&mut self) {
        let file_name = export::default_file_name(chrono::Local::now());
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Excel workbook", &["xlsx"])
            .add_filter("CSV", &["csv"])
            .add_filter("JSON", &["json"])
            .set_file_name(file_name)
            .save_file()
        {
            self.state.export(&path);
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.state.open_paths(dropped);
        }
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (escape, left, right) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
            )
        });
        if escape {
            self.notices.pop_front();
        }
        if left {
            self.state.prev_page();
        }
        if right {
            self.state.next_page();
        }
    }

    /// Re-render when the document, page or zoom changed
    fn refresh_texture(&mut self, ctx: &egui::Context) {
        let key = self.state.page_key();
        if self.texture.as_ref().map(|t| t.key) == key {
            return;
        }
        let (Some(key), Some(view)) = (key, self.state.render_current()) else {
            self.texture = None;
            return;
        };

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [view.image.width as usize, view.image.height as usize],
            &view.image.rgba,
        );
        let handle = ctx.load_texture(
            format!("page_{}_{}_{}", key.document, key.page, key.zoom_percent),
            image,
            egui::TextureOptions::LINEAR,
        );
        self.texture = Some(PageTexture { key, handle });
    }
}

impl eframe::App for RegionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.handle_keyboard_shortcuts(ctx);
        self.refresh_texture(ctx);
        self.notices.extend(self.state.take_notices());

        self.draw_documents_panel(ctx);
        self.draw_preview_panel(ctx);
        self.draw_table_panel(ctx);
        self.draw_page(ctx);
        self.draw_notice_dialog(ctx);
    }
}

impl RegionApp {
    fn draw_documents_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("documents")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.button("📂 Open PDF Folder").clicked() {
                        self.open_folder();
                    }
                    if ui.button("Open Files").clicked() {
                        self.open_files();
                    }
                });
                ui.weak("or drop PDF files on the window");
                ui.separator();

                let current = self.state.current_document().map(|d| d.id());
                let mut select: Option<DocumentId> = None;
                let mut unload: Option<DocumentId> = None;

                egui::ScrollArea::vertical()
                    .id_salt("document_list")
                    .max_height(ui.available_height() * 0.5)
                    .show(ui, |ui| {
                        for doc in self.state.workspace().documents() {
                            ui.horizontal(|ui| {
                                if ui.small_button("✕").on_hover_text("Unload").clicked() {
                                    unload = Some(doc.id());
                                }
                                let label = format!("{} ({} pages)", doc.name(), doc.page_count());
                                if ui
                                    .selectable_label(current == Some(doc.id()), label)
                                    .on_hover_text(doc.path().display().to_string())
                                    .clicked()
                                {
                                    select = Some(doc.id());
                                }
                            });
                        }
                    });

                if let Some(id) = select {
                    self.state.select_document(id);
                }
                if let Some(id) = unload {
                    self.state.unload_document(id);
                }

                ui.separator();
                let has_document = current.is_some();

                ui.add_enabled_ui(has_document, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("◀ Previous").clicked() {
                            self.state.prev_page();
                        }
                        let page_text = if has_document {
                            format!(
                                "{} / {}",
                                self.state.current_page() + 1,
                                self.state.page_count()
                            )
                        } else {
                            "— / —".to_string()
                        };
                        ui.label(page_text);
                        if ui.button("Next ▶").clicked() {
                            self.state.next_page();
                        }
                    });

                    ui.horizontal(|ui| {
                        if ui.button("−").clicked() {
                            self.state.zoom_out();
                        }
                        ui.label(format!("{:.0}%", self.state.zoom() * 100.0));
                        if ui.button("+").clicked() {
                            self.state.zoom_in();
                        }
                    });

                    ui.separator();
                    if ui.button("Sync to All PDFs").clicked() {
                        self.state.sync_to_all();
                    }
                });

                let has_records = !self.state.table().is_empty();
                if ui
                    .add_enabled(has_records, egui::Button::new("Clear All Selections"))
                    .clicked()
                {
                    self.state.clear_all();
                }
                if ui.button("Export Selections").clicked() {
                    self.export();
                }
            });
    }

    fn draw_preview_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("preview")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("Extracted Text");
                ui.separator();
                egui::ScrollArea::vertical()
                    .id_salt("preview")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let preview = self.state.extraction_preview();
                        if preview.is_empty() {
                            ui.weak("Drag on the page to select a region");
                        } else {
                            ui.add(egui::Label::new(preview).selectable(true));
                        }
                    });
            });
    }

    fn draw_table_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("selections")
            .default_height(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.label(format!("Selections ({})", self.state.table().len()));
                let mut delete: Option<RecordId> = None;

                egui::ScrollArea::vertical()
                    .id_salt("selection_table")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        egui::Grid::new("selection_grid")
                            .num_columns(5)
                            .striped(true)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                ui.strong("PDF");
                                ui.strong("Page");
                                ui.strong("Coordinates");
                                ui.strong("Text");
                                ui.strong("");
                                ui.end_row();

                                for record in self.state.table().iter() {
                                    ui.label(record.document_name.as_str());
                                    ui.label((record.page + 1).to_string());
                                    ui.label(record.display_rect.to_string());
                                    if record.text.is_empty() {
                                        ui.weak("(no text)");
                                    } else {
                                        ui.add(egui::Label::new(record.text.as_str()).truncate());
                                    }
                                    if ui.button("Delete").clicked() {
                                        delete = Some(record.id);
                                    }
                                    ui.end_row();
                                }
                            });
                    });

                if let Some(id) = delete {
                    self.state.delete_record(id);
                }
            });
    }

    fn draw_page(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(texture) = &self.texture else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a PDF folder or drop PDF files here");
                });
                return;
            };
            let handle = texture.handle.clone();

            egui::ScrollArea::both()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let size = handle.size_vec2();
                    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::drag());

                    ui.painter().image(
                        handle.id(),
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );

                    let to_page = |pos: egui::Pos2| Point::new(pos.x - rect.min.x, pos.y - rect.min.y);

                    if response.drag_started() {
                        let origin = ui
                            .input(|i| i.pointer.press_origin())
                            .or_else(|| response.interact_pointer_pos());
                        if let Some(pos) = origin {
                            self.state.pointer_down(to_page(pos));
                        }
                    }
                    if response.dragged() {
                        if let Some(pos) = response.interact_pointer_pos() {
                            self.state.pointer_move(to_page(pos));
                        }
                    }
                    if response.drag_stopped() {
                        let last = response
                            .interact_pointer_pos()
                            .or_else(|| ui.input(|i| i.pointer.latest_pos()));
                        if let Some(pos) = last {
                            self.state.pointer_up(to_page(pos));
                        }
                    }

                    let painter = ui.painter_at(rect);
                    let to_screen = |r: Rect| {
                        egui::Rect::from_min_max(
                            rect.min + egui::vec2(r.left, r.top),
                            rect.min + egui::vec2(r.right, r.bottom),
                        )
                    };

                    for overlay in self.state.current_overlays() {
                        painter.rect_stroke(
                            to_screen(overlay),
                            0.0,
                            egui::Stroke::new(2.0, SELECTION_COLOR),
                            egui::StrokeKind::Middle,
                        );
                    }

                    if let Some(dragging) = self.state.in_progress_rect() {
                        let r = to_screen(dragging);
                        let outline = [
                            r.left_top(),
                            r.right_top(),
                            r.right_bottom(),
                            r.left_bottom(),
                            r.left_top(),
                        ];
                        painter.extend(egui::Shape::dashed_line(
                            &outline,
                            egui::Stroke::new(2.0, DRAG_COLOR),
                            6.0,
                            4.0,
                        ));
                    }
                });
        });
    }

    fn draw_notice_dialog(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.notices.front() else {
            return;
        };

        let icon = match notice.severity {
            Severity::Error => "❌",
            Severity::Warning => "⚠",
            Severity::Info => "ℹ",
        };
        let title = format!("{} {}", icon, notice.severity.title());
        let message = notice.message.clone();

        let mut should_close = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&message);
                ui.add_space(12.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    if ui.button("OK").clicked() {
                        should_close = true;
                    }
                });
            });

        if should_close {
            self.notices.pop_front();
        }
    }
}
