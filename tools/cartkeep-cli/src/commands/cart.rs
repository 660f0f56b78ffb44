//! Cart commands.
//!
//! Each command hydrates the cart from the file store, applies at most one
//! mutation, prints the result and waits for the write to finish.

use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use cartkeep::{CartStore, NewLineItem};
use cartkeep_kv::FileStore;
use dialoguer::Confirm;

use super::{AddArgs, ClearArgs, ItemArgs};
use crate::context::Context;

/// Open the configured file store and hydrate the cart from it.
async fn open_cart(ctx: &Context) -> Result<CartStore> {
    let dir = ctx.store_dir();
    ctx.output.debug(&format!("Store: {}", dir.display()));

    let kv = FileStore::open(&dir)
        .await
        .with_context(|| format!("Failed to open store at {}", dir.display()))?;

    CartStore::hydrate(Arc::new(kv), ctx.config.cart.clone())
        .await
        .context("Failed to load cart")
}

/// Wait for pending writes and report whether they landed.
async fn persist(store: &CartStore) -> Result<()> {
    store.flush().await.context("Failed to save cart")?;
    if store.failed_writes() > 0 {
        bail!("Cart was updated but could not be saved; see the log for details");
    }
    Ok(())
}

/// Run the show command.
pub async fn show(ctx: &Context) -> Result<()> {
    let store = open_cart(ctx).await?;
    ctx.output.header("Cart");
    ctx.output.cart(&store.snapshot());
    Ok(())
}

/// Run the add command.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let store = open_cart(ctx).await?;

    let candidate =
        NewLineItem::new(args.id.as_str(), args.title, args.price).with_image_url(args.image_url);
    let cart = store
        .add_to_cart(candidate)
        .with_context(|| format!("Failed to add {}", args.id))?;
    persist(&store).await?;

    ctx.output.success(&format!("Added {}", args.id));
    ctx.output.cart(&cart);
    Ok(())
}

/// Run the inc command.
pub async fn increment(args: ItemArgs, ctx: &Context) -> Result<()> {
    let store = open_cart(ctx).await?;

    if store.snapshot().get(&args.id.as_str().into()).is_none() {
        ctx.output
            .warn(&format!("{} is not in the cart; nothing to increment", args.id));
    }
    let cart = store.increment(args.id.as_str());
    persist(&store).await?;

    ctx.output.cart(&cart);
    Ok(())
}

/// Run the dec command.
pub async fn decrement(args: ItemArgs, ctx: &Context) -> Result<()> {
    let store = open_cart(ctx).await?;

    let cart = store.decrement(args.id.as_str())?;
    persist(&store).await?;

    if cart.get(&args.id.as_str().into()).is_none() {
        ctx.output.success(&format!("Removed {}", args.id));
    }
    ctx.output.cart(&cart);
    Ok(())
}

/// Run the clear command.
pub async fn clear(args: ClearArgs, ctx: &Context) -> Result<()> {
    let store = open_cart(ctx).await?;

    let current = store.snapshot();
    if current.is_empty() {
        ctx.output.info("Cart is already empty");
        return Ok(());
    }

    // Confirmation
    if !args.yes {
        ctx.output.warn(&format!(
            "This will remove {} line(s) ({} unit(s))",
            current.len(),
            current.item_count()
        ));

        let confirmed = Confirm::new()
            .with_prompt("Clear the cart?")
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Clear cancelled");
            return Ok(());
        }
    }

    let cart = store.clear();
    persist(&store).await?;

    ctx.output.success("Cart cleared");
    ctx.output.cart(&cart);
    Ok(())
}
