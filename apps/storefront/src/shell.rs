//! # Line Shell
//!
//! A line-oriented front end for the engine: one command per line, one JSON
//! document per answer.
//!
//! ```text
//! > add 1
//! { "items": [ ... ], "totals": { "itemCount": 1, "subtotalDisplay": "$89.99", ... } }
//! > checkout
//! { "code": "NOT_AUTHENTICATED", "message": "Connect a wallet before checking out" }
//! ```

use serde::Serialize;

use crate::commands::{cart, catalog, checkout, services, session, wishlist};
use crate::error::ApiError;
use crate::App;

pub const HELP: &str = "\
products [category|all] [sort]   list the catalog (sort: featured, price-low-high, price-high-low, popular)
search <text>                    search titles, descriptions and categories
product <id>                     one product
cart                             show the cart
add <id>                         add one unit
qty <id> <n>                     set a quantity (0 removes)
remove <id>                      remove a line
clear                            empty the cart
wishlist                         show the wishlist
heart <id>                       toggle wishlist membership
connect <address>                connect the demo wallet
disconnect                       disconnect the demo wallet
session                          wallet session
theme [light|dark|toggle]        show, set or toggle the theme
services                         utility services, providers and plans
service <kind> <account> <provider> <amount|plan>
                                 pay airtime, data, electricity or cable
checkout                         open checkout (review)
confirm                          review -> payment
pay                              submit payment
ack                              close the confirmation
cancel                           abandon checkout
status                           current checkout step
help                             this text
quit                             exit";

/// What a line produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Output(String),
    Quit,
}

/// Runs one line against the app.
pub async fn execute(app: &App, line: &str) -> Outcome {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Outcome::Output(String::new());
    };
    let args: Vec<&str> = words.collect();

    let engine = app.engine.as_ref();
    let result = match command {
        "quit" | "exit" => return Outcome::Quit,
        "help" => return Outcome::Output(HELP.to_string()),

        "products" => render(catalog::list_products(
            engine,
            args.first().copied(),
            None,
            args.get(1).copied(),
        )),
        "search" => {
            let text = args.join(" ");
            render(catalog::list_products(engine, None, Some(text.as_str()), None))
        }
        "product" => match id_arg(&args, 0) {
            Ok(id) => render(catalog::get_product(engine, id)),
            Err(e) => Err(e),
        },

        "cart" => render(Ok(cart::get_cart(engine))),
        "add" => match id_arg(&args, 0) {
            Ok(id) => render(cart::add_to_cart(engine, id).await),
            Err(e) => Err(e),
        },
        "qty" => match (id_arg(&args, 0), quantity_arg(&args, 1)) {
            (Ok(id), Ok(qty)) => render(cart::update_cart_item(engine, id, qty).await),
            (Err(e), _) | (_, Err(e)) => Err(e),
        },
        "remove" => match id_arg(&args, 0) {
            Ok(id) => render(cart::remove_from_cart(engine, id).await),
            Err(e) => Err(e),
        },
        "clear" => render(cart::clear_cart(engine).await),

        "wishlist" => render(Ok(wishlist::get_wishlist(engine))),
        "heart" => match id_arg(&args, 0) {
            Ok(id) => render(wishlist::toggle_wishlist(engine, id).await),
            Err(e) => Err(e),
        },

        "connect" => match args.first() {
            Some(address) => render(session::connect_wallet(engine, &app.wallet, address).await),
            None => Err(ApiError::validation("usage: connect <address>")),
        },
        "disconnect" => render(session::disconnect_wallet(engine, &app.wallet).await),
        "session" => render(Ok(session::get_session(engine))),
        "theme" => match args.first() {
            None => render(Ok(session::get_theme(engine))),
            Some(&"toggle") => render(session::toggle_theme(engine).await),
            Some(theme) => render(session::set_theme(engine, theme).await),
        },

        "services" => render(Ok(services::list_services())),
        "service" => match args.as_slice() {
            [service, account, provider, amount] => {
                render(services::pay_service(engine, service, account, provider, amount).await)
            }
            _ => Err(ApiError::validation(
                "usage: service <kind> <account> <provider> <amount|plan>",
            )),
        },

        "checkout" => render(checkout::initiate_checkout(engine).await),
        "confirm" => render(checkout::confirm_review(engine).await),
        "pay" => render(checkout::submit_payment(engine).await),
        "ack" => render(checkout::acknowledge(engine).await),
        "cancel" => render(checkout::cancel_checkout(engine).await),
        "status" => render(Ok(checkout::get_checkout(engine))),

        other => Err(ApiError::validation(format!(
            "unknown command '{}', try 'help'",
            other
        ))),
    };

    Outcome::Output(result.unwrap_or_else(|e| to_json(&e)))
}

fn render<T: Serialize>(result: Result<T, ApiError>) -> Result<String, ApiError> {
    result.map(|value| to_json(&value))
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!(r#"{{"code":"INTERNAL","message":"{}"}}"#, e))
}

fn id_arg(args: &[&str], index: usize) -> Result<u64, ApiError> {
    args.get(index)
        .ok_or_else(|| ApiError::validation("product id is required"))?
        .parse()
        .map_err(|_| ApiError::validation("product id must be a positive integer"))
}

fn quantity_arg(args: &[&str], index: usize) -> Result<i64, ApiError> {
    args.get(index)
        .ok_or_else(|| ApiError::validation("quantity is required"))?
        .parse()
        .map_err(|_| ApiError::validation("quantity must be an integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap;
    use crate::state::AppConfig;

    async fn app() -> App {
        let mut config = AppConfig::default();
        config.storage.in_memory = true;
        bootstrap(config).await.unwrap()
    }

    fn json(outcome: Outcome) -> serde_json::Value {
        match outcome {
            Outcome::Output(text) => serde_json::from_str(&text).unwrap(),
            Outcome::Quit => panic!("unexpected quit"),
        }
    }

    #[tokio::test]
    async fn test_add_and_show_cart() {
        let app = app().await;

        let cart = json(execute(&app, "add 1").await);
        assert_eq!(cart["totals"]["itemCount"], 1);
        assert_eq!(cart["totals"]["subtotalDisplay"], "$89.99");

        let cart = json(execute(&app, "qty 1 3").await);
        assert_eq!(cart["items"][0]["quantity"], 3);
    }

    #[tokio::test]
    async fn test_errors_are_json() {
        let app = app().await;

        let err = json(execute(&app, "checkout").await);
        assert_eq!(err["code"], "EMPTY_CART");

        let err = json(execute(&app, "add banana").await);
        assert_eq!(err["code"], "VALIDATION_ERROR");

        let err = json(execute(&app, "frobnicate").await);
        assert_eq!(err["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_quit_and_blank_lines() {
        let app = app().await;
        assert_eq!(execute(&app, "quit").await, Outcome::Quit);
        assert_eq!(execute(&app, "   ").await, Outcome::Output(String::new()));
    }

    #[tokio::test]
    async fn test_listing_command() {
        let app = app().await;
        let listed = json(execute(&app, "products electronics price-high-low").await);
        let ids: Vec<u64> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|card| card["product"]["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![3, 1, 8]);
    }

    #[tokio::test]
    async fn test_theme_and_service_commands() {
        let app = app().await;

        assert_eq!(json(execute(&app, "theme").await)["theme"], "light");
        assert_eq!(json(execute(&app, "theme toggle").await)["theme"], "dark");
        assert_eq!(json(execute(&app, "theme").await)["theme"], "dark");

        let listed = json(execute(&app, "services").await);
        assert_eq!(listed.as_array().unwrap().len(), 4);

        let err = json(execute(&app, "service data 08035550101 MTN 1gb").await);
        assert_eq!(err["code"], "NOT_AUTHENTICATED");

        json(execute(&app, "connect UQBvW8Z5huBkMJYdnfAEM5JqTNkuWX3diqYENkWsIL0XggGG").await);
        let paid = json(execute(&app, "service data 08035550101 MTN 1gb").await);
        assert_eq!(paid["order"]["service"], "data");
        assert_eq!(paid["session"]["balanceDisplay"], "99.50 TON");

        let err = json(execute(&app, "service data 08035550101").await);
        assert_eq!(err["code"], "VALIDATION_ERROR");
    }
}
