use gpui_snow_core::{
    ControlKind, OptionValue, ThemeConfig, ToolbarContainer, ToolbarDescriptorError,
};

#[test]
fn descriptor_builds_buttons_and_selects() -> anyhow::Result<()> {
    let container = ToolbarContainer::from_json(
        r#"[
            ["bold", { "script": "sub" }],
            [{ "header": ["1", "2", false] }, { "color": [] }]
        ]"#,
    )?;

    let buttons: Vec<(&str, Option<&str>, usize)> = container
        .buttons()
        .iter()
        .map(|button| (button.format(), button.value(), button.group()))
        .collect();
    assert_eq!(buttons, vec![("bold", None, 0), ("script", Some("sub"), 0)]);

    let [header, color] = container.selects() else {
        panic!("expected two selects");
    };
    assert_eq!(header.kind(), &ControlKind::Header);
    assert_eq!(header.group(), 1);
    assert_eq!(header.options().len(), 3);
    assert_eq!(header.selected_index(), Some(2));
    assert!(header.options()[2].selected);
    assert_eq!(color.kind(), &ControlKind::Color);
    assert!(color.options().is_empty());
    Ok(())
}

#[test]
fn descriptor_rejects_unsupported_items() {
    let err = ToolbarContainer::from_json(r#"[[{ "bold": true }]]"#).unwrap_err();
    assert!(matches!(err, ToolbarDescriptorError::Item(_)));

    let err = ToolbarContainer::from_json(r#"[[{ "a": [], "b": [] }]]"#).unwrap_err();
    assert!(matches!(err, ToolbarDescriptorError::Item(_)));

    let err = ToolbarContainer::from_json(r#"[[{ "header": [true] }]]"#).unwrap_err();
    assert!(matches!(err, ToolbarDescriptorError::Parse(_)));

    assert!(matches!(
        ToolbarContainer::from_json("{}"),
        Err(ToolbarDescriptorError::Parse(_))
    ));
}

#[test]
fn numeric_option_values_are_kept_as_text() -> anyhow::Result<()> {
    let values: Vec<OptionValue> = serde_json::from_str(r#"[1, "+1", false]"#)?;
    assert_eq!(
        values,
        vec![
            OptionValue::named("1"),
            OptionValue::named("+1"),
            OptionValue::Unset
        ]
    );
    Ok(())
}

#[test]
fn theme_config_round_trips_through_json() -> anyhow::Result<()> {
    let config = ThemeConfig::from_json(r#"{ "link_placeholder": "https://example.com" }"#)?;
    assert_eq!(config.link_placeholder, "https://example.com");
    assert_eq!(config.tooltip_size.width, 280.);

    let json = serde_json::to_string(&config)?;
    assert_eq!(ThemeConfig::from_json(&json)?, config);
    Ok(())
}
