use std::{cell::Cell, rc::Rc};

use part_ngin::gui::{
    ChooseOptionHints, DisplayRefresh, Field, FieldValue, FloatEditHints, FloatRangeHints,
    GameScene, PropertyEditor, ScaleEditHints, Widget,
};

use crate::common::test_utils::init_logger;

mod common;

/// Records every control rebuild the editor asks for.
#[derive(Default)]
struct Recorder {
    refreshed: Vec<(String, FieldValue, Widget)>,
}

impl DisplayRefresh for Recorder {
    fn refresh(&mut self, field: &Field, widget: &Widget) {
        self.refreshed
            .push((field.name.clone(), field.value.clone(), widget.clone()));
    }
}

fn counting_listener(field: &mut Field) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    field.set_listener(Box::new(move |_: &FieldValue| seen.set(seen.get() + 1)));
    count
}

fn float_field(name: &str) -> Field {
    Field::new(name, FieldValue::Float(1.0)).with_widgets(
        Some(Widget::FloatEdit(FloatEditHints::default())),
        Some(Widget::FloatEdit(FloatEditHints::default())),
    )
}

fn scale_field(name: &str) -> Field {
    Field::new(name, FieldValue::Float(1.0)).with_widgets(
        Some(Widget::ScaleEdit(ScaleEditHints::default())),
        Some(Widget::ScaleEdit(ScaleEditHints::default())),
    )
}

fn choice_field(name: &str) -> Field {
    Field::new(name, FieldValue::Choice("small".to_string())).with_widgets(
        Some(Widget::ChooseOption(ChooseOptionHints::default())),
        None,
    )
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn float_edit_hints_apply_with_optional_refresh() {
    let mut editor = PropertyEditor::new(GameScene::Editor, Recorder::default());
    editor.add_field(float_field("diameter"));
    let hints = FloatEditHints {
        min: 0.625,
        max: 5.0,
        inc_large: 1.25,
        inc_small: 0.625,
        inc_slide: 0.05,
    };

    editor.update_float_edit("diameter", hints, false);
    assert_eq!(
        editor.field("diameter").unwrap().editor_widget,
        Some(Widget::FloatEdit(hints))
    );
    assert!(editor.refresher().refreshed.is_empty());

    editor.update_float_edit("diameter", hints, true);
    assert_eq!(editor.refresher().refreshed.len(), 1);
    assert_eq!(editor.refresher().refreshed[0].2, Widget::FloatEdit(hints));
    // the flight widget belongs to another scene
    assert_eq!(
        editor.field("diameter").unwrap().flight_widget,
        Some(Widget::FloatEdit(FloatEditHints::default()))
    );
}

#[test]
fn forced_value_does_not_notify_listener() {
    let mut editor = PropertyEditor::new(GameScene::Editor, Recorder::default());
    let mut field = float_field("height");
    let edits = counting_listener(&mut field);
    editor.add_field(field);

    editor.set_float_edit_value("height", 2.5);

    assert_eq!(editor.field("height").unwrap().value, FieldValue::Float(2.5));
    assert_eq!(editor.refresher().refreshed[0].1, FieldValue::Float(2.5));
    assert_eq!(edits.get(), 0);

    // the listener is reattached after the refresh
    editor.field_mut("height").unwrap().set_value(FieldValue::Float(3.0));
    assert_eq!(edits.get(), 1);
}

#[test]
fn float_range_updates_only_matching_widget() {
    let mut editor = PropertyEditor::new(GameScene::Flight, Recorder::default());
    editor.add_field(
        Field::new("thrust", FieldValue::Float(0.0))
            .with_widgets(None, Some(Widget::FloatRange(FloatRangeHints::default()))),
    );
    editor.add_field(float_field("mass"));

    editor.update_float_range("thrust", 0.0, 100.0, 0.5, true);
    editor.update_float_range("mass", 0.0, 100.0, 0.5, true);

    assert_eq!(
        editor.field("thrust").unwrap().flight_widget,
        Some(Widget::FloatRange(FloatRangeHints {
            min: 0.0,
            max: 100.0,
            step: 0.5
        }))
    );
    assert_eq!(
        editor.field("mass").unwrap().flight_widget,
        Some(Widget::FloatEdit(FloatEditHints::default()))
    );
    assert_eq!(editor.refresher().refreshed.len(), 1);
}

#[test]
fn uniform_scale_stops() {
    let hints = ScaleEditHints::uniform(1.0, 3.0, 0.5).unwrap();

    assert_eq!(hints.intervals, vec![1.0, 1.5, 2.0, 2.5, 3.0]);
    assert_eq!(hints.increments.len(), 5);
    assert!(hints.increments.iter().all(|inc| (inc - 0.025).abs() < 1e-6));

    assert!(ScaleEditHints::uniform(1.0, 3.0, 0.0).is_none());
    assert!(ScaleEditHints::uniform(1.0, 3.0, -0.5).is_none());
    assert!(ScaleEditHints::uniform(2.0, 2.0, 0.5).is_none());
}

#[test]
fn oversized_scale_ranges_are_refused() {
    init_logger();

    assert!(ScaleEditHints::uniform(0.0, f32::MAX, 1e-30).is_none());
    assert!(ScaleEditHints::uniform(0.0, f32::INFINITY, 1.0).is_none());
    assert!(ScaleEditHints::uniform(0.0, 1.0, f32::NAN).is_none());
    assert!(ScaleEditHints::uniform(0.0, 2048.0, 1.0).is_none());

    let widest = ScaleEditHints::uniform(0.0, 1023.0, 1.0).unwrap();
    assert_eq!(widest.intervals.len(), 1024);
}

#[test]
fn scale_range_shows_or_hides_the_field() {
    let mut editor = PropertyEditor::new(GameScene::Editor, Recorder::default());
    editor.add_field(scale_field("length"));

    editor.update_scale_edit_range("length", 0.0, 2.0, 1.0, false, true, true);

    let field = editor.field("length").unwrap();
    assert!(!field.gui_active);
    assert!(field.gui_active_editor);
    assert_eq!(
        field.editor_widget,
        Some(Widget::ScaleEdit(ScaleEditHints {
            intervals: vec![0.0, 1.0, 2.0],
            increments: vec![0.05; 3],
        }))
    );
    assert_eq!(editor.refresher().refreshed.len(), 1);

    editor.update_scale_edit_range("length", 2.0, 2.0, 1.0, true, true, true);

    let field = editor.field("length").unwrap();
    assert!(!field.gui_active);
    assert!(!field.gui_active_editor);
    assert_eq!(editor.refresher().refreshed.len(), 1);
}

#[test]
fn scale_edit_refresh_only_for_scale_widgets() {
    let mut editor = PropertyEditor::new(GameScene::Editor, Recorder::default());
    editor.add_field(scale_field("length"));
    editor.add_field(float_field("mass"));

    editor.refresh_scale_edit("length");
    editor.refresh_scale_edit("mass");
    editor.refresh_scale_edit("missing");

    let names: Vec<&str> = editor
        .refresher()
        .refreshed
        .iter()
        .map(|(name, _, _)| name.as_str())
        .collect();
    assert_eq!(names, vec!["length"]);
}

#[test]
fn choose_option_selects_forced_value() {
    init_logger();
    let mut editor = PropertyEditor::new(GameScene::Editor, Recorder::default());
    let mut field = choice_field("variant");
    let edits = counting_listener(&mut field);
    editor.add_field(field);

    editor.update_choose_option(
        "variant",
        strings(&["small", "large"]),
        strings(&["Small", "Large"]),
        true,
        "large",
    );

    let field = editor.field("variant").unwrap();
    assert!(field.gui_active_editor);
    assert_eq!(field.value, FieldValue::Choice("large".to_string()));
    assert_eq!(
        field.editor_widget,
        Some(Widget::ChooseOption(ChooseOptionHints {
            options: strings(&["small", "large"]),
            display: strings(&["Small", "Large"]),
        }))
    );
    assert_eq!(editor.refresher().refreshed.len(), 1);
    assert_eq!(edits.get(), 0);
}

#[test]
fn unknown_forced_choice_is_not_selected() {
    init_logger();
    let mut editor = PropertyEditor::new(GameScene::Editor, Recorder::default());
    editor.add_field(choice_field("variant"));

    editor.update_choose_option("variant", strings(&["a", "b"]), strings(&["A", "B"]), true, "c");

    assert_eq!(
        editor.field("variant").unwrap().value,
        FieldValue::Choice("small".to_string())
    );
    assert!(editor.refresher().refreshed.is_empty());
}

#[test]
fn single_or_missing_options_hide_the_control() {
    let mut editor = PropertyEditor::new(GameScene::Editor, Recorder::default());
    editor.add_field(choice_field("variant"));

    editor.update_choose_option("variant", strings(&["only"]), Vec::new(), false, "only");
    assert!(!editor.field("variant").unwrap().gui_active_editor);
    assert_eq!(
        editor.field("variant").unwrap().editor_widget,
        Some(Widget::ChooseOption(ChooseOptionHints {
            options: strings(&["only"]),
            display: strings(&["NONE"]),
        }))
    );

    editor.update_choose_option("variant", Vec::new(), Vec::new(), false, "");
    assert_eq!(
        editor.field("variant").unwrap().editor_widget,
        Some(Widget::ChooseOption(ChooseOptionHints {
            options: strings(&["NONE"]),
            display: Vec::new(),
        }))
    );
}

#[test]
fn choose_option_outside_editor_only_toggles_visibility() {
    let mut editor = PropertyEditor::new(GameScene::Flight, Recorder::default());
    editor.add_field(choice_field("variant"));

    editor.update_choose_option("variant", strings(&["a", "b"]), Vec::new(), true, "a");

    let field = editor.field("variant").unwrap();
    assert!(field.gui_active_editor);
    assert_eq!(field.editor_widget, Some(Widget::ChooseOption(ChooseOptionHints::default())));
    assert!(editor.refresher().refreshed.is_empty());
}

#[test]
fn enable_flags_and_other_scenes() {
    let mut editor = PropertyEditor::new(GameScene::Other, Recorder::default());
    editor.add_field(float_field("mass"));

    editor.set_field_enabled_editor("mass", false);
    editor.set_field_enabled_flight("mass", false);
    editor.update_float_edit("mass", FloatEditHints::default(), true);
    editor.set_float_edit_value("mass", 9.0);

    let field = editor.field("mass").unwrap();
    assert!(!field.gui_active_editor);
    assert!(!field.gui_active);
    assert_eq!(field.value, FieldValue::Float(1.0));
    assert!(editor.refresher().refreshed.is_empty());
}
