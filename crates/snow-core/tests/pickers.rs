use gpui_snow_core::{
    ALIGNS, COLORS, ControlKind, Editor, EditorHandle, FONTS, HEADERS, IconBundle, MemoryEditor,
    OptionEntry, OptionValue, PickerVariant, Range, SIZES, SelectControl, Source,
    ToolbarContainer, build_pickers, fill_select, option_values, subscribe_picker_updates,
};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn values(select: &SelectControl) -> Vec<Option<&str>> {
    select
        .options()
        .iter()
        .map(|entry| entry.value.as_deref())
        .collect()
}

#[test]
fn rendered_options_keep_order_and_mark_the_default() {
    let mut select = SelectControl::new(ControlKind::Size);
    fill_select(
        &mut select,
        &option_values(&[Some("small"), None, Some("large")]),
        &OptionValue::Unset,
    );

    assert_eq!(
        select.options(),
        &[
            OptionEntry {
                value: Some("small".into()),
                selected: false,
            },
            OptionEntry {
                value: None,
                selected: true,
            },
            OptionEntry {
                value: Some("large".into()),
                selected: false,
            },
        ]
    );
    assert_eq!(
        select.options().iter().filter(|entry| entry.selected).count(),
        1
    );
}

#[test]
fn empty_header_control_gets_the_header_list() {
    let mut container =
        ToolbarContainer::new().with_select(SelectControl::new(ControlKind::Header));
    build_pickers(&mut container, &IconBundle::snow());

    let Some(header) = container.select(0) else {
        panic!("expected header select");
    };
    assert_eq!(values(header), vec![Some("1"), Some("2"), Some("3"), None]);
    assert_eq!(header.selected_index(), Some(3));
    assert!(header.options()[3].selected);
    assert_eq!(HEADERS.len(), header.options().len());
}

#[test]
fn every_empty_control_selects_exactly_its_default() {
    let cases = [
        (ControlKind::Align, ALIGNS, 0),
        (ControlKind::Font, FONTS, 0),
        (ControlKind::Size, SIZES, 1),
        (ControlKind::Header, HEADERS, 3),
        (ControlKind::Color, COLORS, 0),
        (ControlKind::Background, COLORS, 7),
    ];
    let mut container = ToolbarContainer::new();
    for (kind, _, _) in &cases {
        container = container.with_select(SelectControl::new(kind.clone()));
    }
    build_pickers(&mut container, &IconBundle::snow());

    for (ix, (kind, list, default)) in cases.iter().enumerate() {
        let Some(select) = container.select(ix) else {
            panic!("expected a select for {kind:?}");
        };
        assert_eq!(values(select), list.to_vec(), "{kind:?} order");
        assert_eq!(select.selected_index(), Some(*default), "{kind:?} default");
        let selected: Vec<usize> = select
            .options()
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.selected)
            .map(|(ix, _)| ix)
            .collect();
        assert_eq!(selected, vec![*default], "{kind:?} marks");
    }
}

#[test]
fn building_twice_never_duplicates_entries() {
    let mut container = ToolbarContainer::new()
        .with_select(SelectControl::new(ControlKind::Font))
        .with_select(SelectControl::new(ControlKind::Background))
        .with_select(SelectControl::with_values(
            ControlKind::Size,
            &[OptionValue::named("small"), OptionValue::Unset],
        ));
    let icons = IconBundle::snow();

    build_pickers(&mut container, &icons);
    let first: Vec<usize> = container.selects().iter().map(|s| s.options().len()).collect();
    build_pickers(&mut container, &icons);
    let second: Vec<usize> = container.selects().iter().map(|s| s.options().len()).collect();

    assert_eq!(first, vec![3, COLORS.len(), 2]);
    assert_eq!(first, second);
    assert_eq!(container.pickers().len(), 3);
}

#[test]
fn variants_follow_the_control_kind() {
    let mut container = ToolbarContainer::new()
        .with_select(SelectControl::new(ControlKind::Align))
        .with_select(SelectControl::new(ControlKind::Color))
        .with_select(SelectControl::new(ControlKind::Background))
        .with_select(SelectControl::new(ControlKind::Font))
        .with_select(SelectControl::new(ControlKind::Other("emoji".into())));
    build_pickers(&mut container, &IconBundle::snow());

    let variants: Vec<PickerVariant> = container.pickers().iter().map(|p| p.variant()).collect();
    assert_eq!(
        variants,
        vec![
            PickerVariant::Icon,
            PickerVariant::Color,
            PickerVariant::Color,
            PickerVariant::Plain,
            PickerVariant::Plain,
        ]
    );

    // background defaults to white, color to black
    let background = &container.selects()[2];
    assert_eq!(background.default_index(), Some(7));
    let color = &container.selects()[1];
    assert_eq!(color.default_index(), Some(0));

    let emoji = &container.selects()[4];
    assert!(emoji.options().is_empty());
    assert_eq!(container.pickers()[4].format(), "emoji");
}

#[test]
fn pickers_follow_the_formats_at_the_caret() {
    let memory = MemoryEditor::new("plain centered").into_handle();
    let editor: EditorHandle = memory.clone();

    let container = Rc::new(RefCell::new(
        ToolbarContainer::new()
            .with_select(SelectControl::new(ControlKind::Align))
            .with_select(SelectControl::new(ControlKind::Color)),
    ));
    build_pickers(&mut container.borrow_mut(), &IconBundle::snow());
    let subscription = subscribe_picker_updates(&container, &editor);

    memory
        .borrow_mut()
        .format_range(Range::new(6, 8), "color", json!("#e60000"), Source::Api);
    memory
        .borrow_mut()
        .format_range(Range::new(6, 8), "align", json!("center"), Source::Api);
    memory
        .borrow_mut()
        .set_selection(Some(Range::caret(10)), Source::User);
    MemoryEditor::pump(&memory);

    {
        let container = container.borrow();
        let align = &container.pickers()[0];
        let select = &container.selects()[0];
        assert!(align.is_active(select));
        assert_eq!(
            align.label_icon(select).map(|icon| icon.path().to_string()),
            Some("icons/align-center.svg".to_string())
        );

        let color = &container.pickers()[1];
        let select = &container.selects()[1];
        assert_eq!(color.label_color(select).as_deref(), Some("#e60000"));
        assert!(color.is_active(select));
    }

    // a value no entry lists selects nothing
    memory
        .borrow_mut()
        .format_range(Range::new(0, 5), "color", json!("#123456"), Source::Api);
    memory
        .borrow_mut()
        .set_selection(Some(Range::caret(3)), Source::User);
    MemoryEditor::pump(&memory);
    assert_eq!(container.borrow().selects()[1].selected_index(), None);

    memory.borrow_mut().set_selection(None, Source::User);
    MemoryEditor::pump(&memory);
    assert_eq!(container.borrow().selects()[0].selected_index(), None);

    assert!(subscription.unsubscribe());
    memory
        .borrow_mut()
        .set_selection(Some(Range::caret(10)), Source::User);
    MemoryEditor::pump(&memory);
    assert_eq!(container.borrow().selects()[0].selected_index(), None);
    assert_eq!(editor.borrow().selection(), Some(Range::caret(10)));
}
