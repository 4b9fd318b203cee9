use gpui::*;
use gpui_component::{Root, TitleBar};
use gpui_snow_story::snow_editor::{self, SnowEditorExample};
use gpui_snow_toolbar::assets::SnowAssetSource;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = Application::new().with_assets(SnowAssetSource::new());

    app.run(move |cx| {
        gpui_component::init(cx);
        snow_editor::init(cx);
        cx.activate(true);

        cx.spawn(async move |cx| {
            cx.open_window(
                WindowOptions {
                    titlebar: Some(TitleBar::title_bar_options()),
                    ..Default::default()
                },
                |window, cx| {
                    window.set_window_title("Snow Toolbar");
                    let view = SnowEditorExample::view(window, cx);
                    cx.new(|cx| Root::new(view, window, cx))
                },
            )?;

            Ok::<_, anyhow::Error>(())
        })
        .detach();
    });
}
