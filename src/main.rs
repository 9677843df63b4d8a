use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use hosting_trial::form::CHECKOUT_ERROR_MESSAGE;
use hosting_trial::report::write_quote;
use hosting_trial::{
    Extension, FormEvent, FormExit, Navigator, ServerLocation, Settings, SignupForm,
};

#[derive(Parser, Debug)]
#[command(name = "hosting-trial", version)]
#[command(about = "Price a free hosting trial and start its checkout")]
struct Args {
    /// Domain label, without the extension
    domain: String,

    #[arg(short, long, default_value = ".com")]
    extension: Extension,

    #[arg(short, long, default_value = "USA")]
    location: ServerLocation,

    #[arg(short, long)]
    coupon: Option<String>,

    /// Check whether the domain is available
    #[arg(long)]
    check: bool,

    /// Start the checkout and print the payment page URL
    #[arg(long)]
    checkout: bool,
}

/// Prints the checkout page instead of opening it.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&mut self, url: &str) {
        println!("redirect,{url}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Before the subscriber, so RUST_LOG may come from .env
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(reason = %e, "ignoring unreadable .env file");
        }
    }

    let args = Args::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut form = match SignupForm::from_settings(&settings, PrintNavigator) {
        Ok(form) => form,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut events = vec![
        FormEvent::DomainLabel(args.domain),
        FormEvent::Extension(args.extension),
        FormEvent::Location(args.location),
    ];
    if let Some(code) = args.coupon {
        events.push(FormEvent::CouponCode(code));
        events.push(FormEvent::ApplyCoupon);
    }
    if args.check {
        events.push(FormEvent::CheckAvailability);
    }
    form.run(tokio_stream::iter(events)).await;

    let quote = match form.quote() {
        Ok(quote) => quote,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = write_quote(io::stdout().lock(), &quote, form.ui().availability) {
        eprintln!("failed to write quote: {e}");
        return ExitCode::FAILURE;
    }

    if !args.checkout {
        return ExitCode::SUCCESS;
    }

    match form.run(tokio_stream::iter([FormEvent::Submit])).await {
        FormExit::Navigated(_) => ExitCode::SUCCESS,
        FormExit::Idle => {
            let message = form
                .ui()
                .error_message
                .as_deref()
                .unwrap_or(CHECKOUT_ERROR_MESSAGE);
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
