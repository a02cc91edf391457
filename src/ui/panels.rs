use eframe::egui::{self, Color32, RichText, Ui};
use hatvp_dataviz::views::ViewKind;

use crate::state::{AppState, LoadStatus};

// ---------------------------------------------------------------------------
// Left side panel – view selector and query controls
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("HATVP Explorer");
    ui.label(
        RichText::new("Transparency data from French public officials.")
            .small()
            .weak(),
    );
    ui.separator();

    ui.strong("Views");
    for kind in ViewKind::ALL {
        let selected = state.view.kind == kind;
        if ui.selectable_label(selected, kind.title()).clicked() {
            state.select_view(kind);
        }
    }
    ui.separator();

    if state.view.kind.is_searchable() {
        query_controls(ui, state);
    }
}

fn query_controls(ui: &mut Ui, state: &mut AppState) {
    let view = &mut state.view;

    ui.strong("Search");
    let mut search = view.params.search.clone();
    ui.add(
        egui::TextEdit::singleline(&mut search)
            .hint_text("Type a name...")
            .desired_width(f32::INFINITY),
    );
    view.set_search(search);

    ui.add_space(6.0);
    ui.strong("Top N");
    let response = ui.add(
        egui::TextEdit::singleline(&mut view.top_n_input)
            .hint_text("1-50")
            .desired_width(60.0),
    );
    if response.lost_focus() {
        view.commit_top_n();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!("{}", state.config.data_dir.display()));
        ui.separator();

        match &state.view.status {
            LoadStatus::Loading(_) => {
                ui.spinner();
                ui.label(format!("Loading {}…", state.view.kind.resource()));
            }
            LoadStatus::Loaded(ds) => {
                ui.label(format!(
                    "{} rows loaded, {} shown",
                    ds.len(),
                    state.view.derived.len()
                ));
            }
            LoadStatus::Failed(msg) => {
                ui.label(RichText::new(format!("Error: {msg}")).color(Color32::RED));
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Select the folder holding the dashboard CSV files")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        state.set_data_dir(dir);
    }
}
