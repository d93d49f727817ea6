use hintfield_core::*;
use hintfield_platform::HeadlessHost;
use hintfield_ui::*;
use web_time::Duration;

const FRAME: Duration = Duration::from_millis(16);

fn app(_s: &mut Scheduler) -> View {
    let password = VisualTransformation::password();
    let field = || Modifier::new().fill_max_width();
    Column(
        Modifier::new()
            .padding(24.0)
            .background(theme().background),
    )
    .child((
        Text("Sign in").text_style(typography().label_large),
        Box(Modifier::new().height(16.0)),
        HintedTextField(field(), "name", &VisualTransformation::None),
        Box(Modifier::new().height(12.0)),
    ))
    .child(HintedTextField(field(), "password", &password))
}

fn report(host: &HeadlessHost, what: &str) {
    let Some(frame) = host.last_frame() else {
        return;
    };
    let texts: Vec<&str> = frame.scene.texts().map(|(_, t)| t).collect();
    log::info!(
        "{what}: focused={:?} animating={} text runs={texts:?}",
        host.focused(),
        host.is_animating()
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut host = HeadlessHost::new(app).with_size(480, 320);
    host.frame(FRAME)?;
    report(&host, "initial");

    host.dispatch(InputEvent::FocusNext)?;
    host.frame(FRAME)?;
    report(&host, "name focused");
    let frames = host.settle(FRAME, 600)?;
    log::info!("name hint settled after {frames} frames");

    host.type_text("ada")?;
    host.dispatch(InputEvent::FocusNext)?;
    host.frame(FRAME)?;
    report(&host, "password focused");

    host.type_text("hunter2")?;
    let frames = host.settle(FRAME, 600)?;
    report(&host, "typed");
    log::info!("password hint settled after {frames} frames");

    for key in host.input_keys() {
        if let Some(input) = host.last_frame().and_then(|f| f.input(key)) {
            log::info!("input {key}: stored {:?}", input.value);
        }
    }
    Ok(())
}
