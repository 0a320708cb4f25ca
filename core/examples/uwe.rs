//! A one-command application.
//!
//! ```text
//! cargo run -p cmdtree-core --example uwe -- r -m 32
//! ```

use cmdtree_core::{App, Command, StringFlag};

fn main() {
    let app = App::new("uwe")
        .with_version("0.1.0")
        .with_flag(StringFlag::new("m").with_default("moe").with_usage("message"))
        .with_action(|ctx| println!("flag: {}", ctx.string().get("m")))
        .with_command(
            Command::new("run")
                .with_aliases(["r", "rnu", "nur"])
                .with_short("run something")
                .with_description("simply run")
                .with_flag(StringFlag::new("m").with_default("moe").with_usage("message"))
                .with_action(|ctx| {
                    println!("run command invoked with m flag value {}", ctx.string().get("m"));
                }),
        );

    let args: Vec<String> = std::env::args().collect();
    if let Err(err) = app.run(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
