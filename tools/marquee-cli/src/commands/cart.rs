//! Cart commands.

use anyhow::Result;
use dialoguer::Confirm;
use marquee_commerce::cart::{CartRepository, CartStore, NewCartItem};
use marquee_commerce::ids::{ArtistId, ItemId};

use super::{CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;

    match args.command {
        CartCommand::Add {
            id,
            name,
            price,
            kind,
            description,
            image_url,
            artist,
            subcategory,
        } => {
            let mut entry = NewCartItem::new(kind, id.as_str(), name.as_str(), price)?;
            if let Some(description) = description {
                entry = entry.with_description(description);
            }
            if let Some(url) = image_url {
                entry = entry.with_image_url(url);
            }
            if let Some(artist) = artist {
                entry = entry.with_artist(ArtistId::new(artist));
            }
            if let Some(subcategory) = subcategory {
                entry = entry.with_subcategory(subcategory);
            }

            cart.add_item(entry);
            let quantity = cart
                .cart()
                .get_item(&ItemId::new(id.as_str()))
                .map(|item| item.quantity)
                .unwrap_or_default();
            ctx.output
                .success(&format!("Added {} (quantity {})", name, quantity));
        }
        CartCommand::Remove { id } => {
            let id = ItemId::new(id);
            if cart.cart().get_item(&id).is_none() {
                ctx.output.warn(&format!("{} is not in the cart", id));
            } else {
                cart.remove_item(&id);
                ctx.output.success(&format!("Removed {}", id));
            }
        }
        CartCommand::Update { id, quantity } => {
            let id = ItemId::new(id);
            if cart.cart().get_item(&id).is_none() {
                ctx.output.warn(&format!("{} is not in the cart", id));
            } else {
                cart.update_quantity(&id, quantity)?;
                if quantity <= 0 {
                    ctx.output.success(&format!("Removed {}", id));
                } else {
                    ctx.output
                        .success(&format!("Set {} to quantity {}", id, quantity));
                }
            }
        }
        CartCommand::List => {}
        CartCommand::Clear { yes } => {
            if cart.is_empty() {
                ctx.output.info("Cart is already empty");
                return Ok(());
            }
            if !yes && !ctx.output.is_json() {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Remove all {} items from the cart?",
                        cart.get_cart_item_count()
                    ))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    ctx.output.info("Cart left as it is");
                    return Ok(());
                }
            }
            cart.clear_cart();
            ctx.output.success("Cart cleared");
        }
    }

    print_cart(&cart, ctx);
    Ok(())
}

/// Print the cart as a table, or as JSON.
pub fn print_cart<R: CartRepository>(cart: &CartStore<R>, ctx: &Context) {
    let currency = ctx.config.checkout.currency;
    let pricing = cart.pricing();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "items": cart.items(),
            "itemCount": pricing.item_count,
            "total": pricing.display_total(currency),
        }));
        return;
    }

    ctx.output.header("Cart");
    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return;
    }

    let widths = [20, 8, 28, 4, 10, 10];
    ctx.output
        .table_row(&["ID", "KIND", "NAME", "QTY", "PRICE", "SUBTOTAL"], &widths);
    for (item, row) in cart.items().iter().zip(pricing.rows.iter()) {
        let price = currency.format_major(item.unit_price);
        let subtotal = row.display_subtotal(currency);
        let quantity = item.quantity.to_string();
        ctx.output.table_row(
            &[
                item.id.as_str(),
                item.kind.as_str(),
                &item.display_name,
                &quantity,
                &price,
                &subtotal,
            ],
            &widths,
        );
    }
    println!();
    ctx.output
        .kv("Items", &pricing.item_count.to_string());
    ctx.output.kv("Total", &pricing.display_total(currency));
}
