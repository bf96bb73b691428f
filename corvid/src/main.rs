use corvid::Engine;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut engine = Engine::new();
    engine.run()
}
