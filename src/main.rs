use std::io::{BufRead, Write};
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eburger_pos::{
    auth,
    checkout::checkout,
    config::AppConfig,
    describe::DescriptionAssist,
    dto::{orders::CheckoutRequest, products::ProductDraft},
    error::AppError,
    models::{OrderStatus, PaymentMethod, StoreSettings},
    state::AppState,
    storage::FileStorage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,eburger_pos=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let storage = Arc::new(FileStorage::new(&config.data_dir)?);
    let mut state = AppState::load(storage)?;
    let assist = DescriptionAssist::new(&config);

    tracing::info!(data_dir = %config.data_dir.display(), "e-Burger ready");
    println!("e-Burger — type `help` for commands.");

    let stdin = std::io::stdin();
    let mut operator = false;
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let args: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, rest)) = args.split_first() else {
            continue;
        };
        if command == "quit" || command == "exit" {
            break;
        }
        if let Err(err) = dispatch(&mut state, &assist, &config, &mut operator, command, rest).await
        {
            println!("error: {err}");
        }
    }
    Ok(())
}

async fn dispatch(
    state: &mut AppState,
    assist: &DescriptionAssist,
    config: &AppConfig,
    operator: &mut bool,
    command: &str,
    rest: &[&str],
) -> Result<(), AppError> {
    match command {
        "help" => print_help(),
        "menu" => {
            let filter = rest.first().copied();
            for product in state.catalog.products() {
                if filter.is_none_or(|c| product.category.eq_ignore_ascii_case(c)) {
                    println!(
                        "  [{}] {} — {} ({}) — {}",
                        product.id, product.name, product.price, product.category,
                        product.description
                    );
                }
            }
            println!("categories: All {}", state.catalog.categories().join(" "));
        }
        "add" => {
            let id = expect_arg(rest, 0, "add <product-id>")?;
            let product = state.catalog.get(id).ok_or(AppError::NotFound)?.clone();
            state.cart.add_item(&product);
            println!("added {} (cart: {} items)", product.name, state.cart.count());
        }
        "cart" => {
            for line in state.cart.lines() {
                println!(
                    "  [{}] {} x{} = {}",
                    line.product.id, line.product.name, line.quantity, line.subtotal()
                );
            }
            println!("total: {}", state.cart.total());
        }
        "qty" => {
            let id = expect_arg(rest, 0, "qty <product-id> <delta>")?;
            let delta: i32 = expect_arg(rest, 1, "qty <product-id> <delta>")?
                .parse()
                .map_err(|_| AppError::Validation("delta must be an integer".into()))?;
            state.cart.update_quantity(id, delta);
            println!("total: {}", state.cart.total());
        }
        "remove" => {
            let id = expect_arg(rest, 0, "remove <product-id>")?;
            state.cart.remove_item(id);
            println!("total: {}", state.cart.total());
        }
        "checkout" => {
            let method = parse_method(expect_arg(rest, 0, "checkout <cash|qr> <table> <name>")?)?;
            let table_no = expect_arg(rest, 1, "checkout <cash|qr> <table> <name>")?.to_string();
            let customer_name = rest[2..].join(" ");
            let order = checkout(
                state,
                CheckoutRequest {
                    customer_name,
                    table_no,
                    payment_method: method,
                },
            )?;
            println!("order {} placed, total {}", order.id, order.total_amount);
            if order.payment_method == PaymentMethod::Qr {
                match &state.settings.get().qr_code_image {
                    Some(_) => println!("scan the store QR code to pay"),
                    None => println!("QR payment chosen but no QR code is configured"),
                }
            }
        }
        "login" => {
            let username = expect_arg(rest, 0, "login <username> <password>")?;
            let password = expect_arg(rest, 1, "login <username> <password>")?;
            auth::verify_operator(config, username, password)?;
            *operator = true;
            println!("operator mode on");
        }
        "logout" => {
            *operator = false;
            println!("operator mode off");
        }
        "orders" => {
            ensure_operator(*operator)?;
            for order in state.ledger.orders() {
                println!(
                    "  [{}] {:?} — {} (table {}) — {} — {} items — {}",
                    order.id,
                    order.status,
                    order.customer_name,
                    order.table_no,
                    order.total_amount,
                    order.items.len(),
                    order.created_at.format("%Y-%m-%d %H:%M:%S"),
                );
            }
        }
        "complete" | "cancel" => {
            ensure_operator(*operator)?;
            let id = expect_arg(rest, 0, "complete|cancel <order-id>")?;
            let status = if command == "complete" {
                OrderStatus::Completed
            } else {
                OrderStatus::Cancelled
            };
            let order = state.ledger.set_status(id, status)?;
            println!("order {} is now {:?}", order.id, order.status);
        }
        "product-add" => {
            ensure_operator(*operator)?;
            let price: Decimal = expect_arg(rest, 0, "product-add <price> <category> <name>")?
                .parse()
                .map_err(|_| AppError::Validation("price must be a decimal".into()))?;
            let category = expect_arg(rest, 1, "product-add <price> <category> <name>")?;
            let name = rest[2..].join(" ");
            // Draft the menu copy up front; the assist falls back on its own.
            let description = assist.generate(&name, category).await;
            let product = state.catalog.add(ProductDraft {
                name,
                description,
                price,
                category: category.to_string(),
                image: None,
            })?;
            println!("added [{}] {} — {}", product.id, product.name, product.description);
        }
        "product-update" => {
            ensure_operator(*operator)?;
            let usage = "product-update <product-id> <price> <category> <name>";
            let id = expect_arg(rest, 0, usage)?;
            let price: Decimal = expect_arg(rest, 1, usage)?
                .parse()
                .map_err(|_| AppError::Validation("price must be a decimal".into()))?;
            let category = expect_arg(rest, 2, usage)?;
            let name = rest[3..].join(" ");
            // Description and image carry over from the committed entry.
            let existing = state.catalog.get(id).ok_or(AppError::NotFound)?.clone();
            let product = state.catalog.update(
                id,
                ProductDraft {
                    name,
                    description: existing.description,
                    price,
                    category: category.to_string(),
                    image: existing.image,
                },
            )?;
            println!(
                "updated [{}] {} — {} ({})",
                product.id, product.name, product.price, product.category
            );
        }
        "product-remove" => {
            ensure_operator(*operator)?;
            let id = expect_arg(rest, 0, "product-remove <product-id>")?;
            state.catalog.remove(id)?;
            println!("removed {id}");
        }
        "qr-set" => {
            ensure_operator(*operator)?;
            let payload = expect_arg(rest, 0, "qr-set <base64>")?;
            state.settings.set(StoreSettings {
                qr_code_image: Some(payload.to_string()),
            })?;
            println!("QR code configured");
        }
        "qr-clear" => {
            ensure_operator(*operator)?;
            state.settings.set(StoreSettings::default())?;
            println!("QR code cleared");
        }
        _ => println!("unknown command, try `help`"),
    }
    Ok(())
}

fn ensure_operator(operator: bool) -> Result<(), AppError> {
    if operator { Ok(()) } else { Err(AppError::Forbidden) }
}

fn expect_arg<'a>(rest: &[&'a str], index: usize, usage: &str) -> Result<&'a str, AppError> {
    rest.get(index)
        .copied()
        .ok_or_else(|| AppError::Validation(format!("usage: {usage}")))
}

fn parse_method(raw: &str) -> Result<PaymentMethod, AppError> {
    match raw.to_ascii_lowercase().as_str() {
        "cash" => Ok(PaymentMethod::Cash),
        "qr" => Ok(PaymentMethod::Qr),
        _ => Err(AppError::Validation("payment method must be cash or qr".into())),
    }
}

fn print_help() {
    println!("customer:");
    println!("  menu [category]                   list the menu");
    println!("  add <product-id>                  add one unit to the cart");
    println!("  cart                              show cart lines and total");
    println!("  qty <product-id> <delta>          adjust a line's quantity");
    println!("  remove <product-id>               drop a line");
    println!("  checkout <cash|qr> <table> <name>");
    println!("operator:");
    println!("  login <username> <password> / logout");
    println!("  orders                            list orders, newest first");
    println!("  complete <order-id> / cancel <order-id>");
    println!("  product-add <price> <category> <name>");
    println!("  product-update <product-id> <price> <category> <name>");
    println!("  product-remove <product-id>");
    println!("  qr-set <base64> / qr-clear");
    println!("  quit");
}
