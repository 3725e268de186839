//! Scripted session against an in-memory Tradewind server.
//!
//! Two players connect. Each sends a few commands, some valid and some not,
//! and every reply is printed. Run with `RUST_LOG=tradewind=debug` to see
//! the server's view as well.
//!
//! Optional arguments:
//!   --config <file>   server config JSON
//!   --ruleset <file>  ruleset JSON (defaults to the classic rules)

use std::sync::Arc;

use tradewind::prelude::*;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

const ALICE: PlayerId = PlayerId(1);
const BOB: PlayerId = PlayerId(2);

struct Game {
    world: SharedWorld,
    colonist: String,
    wagon: String,
    colony: String,
    bob_wagon: String,
}

fn new_game(spec: &Specification) -> Result<Game, Box<dyn std::error::Error>> {
    let unit_type = |id: &str| {
        spec.unit_type(id)
            .cloned()
            .ok_or_else(|| format!("ruleset has no unit type {id}"))
    };
    let colonist_type = unit_type("model.unit.freeColonist")?;
    let wagon_type = unit_type("model.unit.wagonTrain")?;

    let mut world = World::new();
    let home = Tile::new(12, 30);
    let colony = world.add_colony(ALICE, "Jamestown", home);
    let colonist = world.add_unit(ALICE, colonist_type, Some(Tile::new(13, 30)));
    let wagon = world.add_unit(ALICE, wagon_type.clone(), Some(home));
    world.load_cargo(&wagon, "model.goods.furs", 40)?;
    let bob_wagon = world.add_unit(BOB, wagon_type, Some(Tile::new(50, 8)));
    world.load_cargo(&bob_wagon, "model.goods.tobacco", 60)?;

    Ok(Game {
        world: SharedWorld::new(world),
        colonist,
        wagon,
        colony,
        bob_wagon,
    })
}

fn parse_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

async fn send(
    conn: &mut ClientConnection,
    element: WireElement,
) -> Result<(), Box<dyn std::error::Error>> {
    let frame = JsonCodec.encode(&element)?;
    let reply = conn.request(frame).await?;
    let reply: WireElement = JsonCodec.decode(&reply)?;

    let request = serde_json::to_string(&element)?;
    match Outcome::from_element(reply) {
        Ok(Outcome::Update(update)) => {
            println!("{} {request}\n    -> {}", conn.player(), serde_json::to_string(&update)?);
        }
        Ok(Outcome::ClientError(err)) => {
            println!("{} {request}\n    -> rejected: {err}", conn.player());
        }
        Err(err) => {
            println!("{} {request}\n    -> {err}", conn.player());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("colony_demo=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = match parse_arg(&args, "--config") {
        Some(path) => ServerConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => ServerConfig::default(),
    };
    let spec = match parse_arg(&args, "--ruleset") {
        Some(path) => Specification::from_json(&std::fs::read_to_string(path)?)?,
        None => Specification::classic(),
    };

    let game = new_game(&spec)?;
    let server = ProtocolServer::builder().config(config).build(
        Arc::new(game.world.clone()),
        Arc::new(spec),
        Arc::new(InGameController::new(game.world.clone())),
    );
    tracing::info!(tags = ?server.registry().tags(), "server ready");

    let mut alice = server.connect(ALICE);
    let mut bob = server.connect(BOB);

    let script = [
        WireElement::encode(
            "changeWorkType",
            [("unit", game.colonist.as_str()), ("workType", "model.goods.lumber")],
        ),
        WireElement::encode("rename", [("nameable", game.colony.as_str()), ("name", "Roanoke")]),
        WireElement::encode(
            "unloadGoods",
            [("type", "model.goods.furs"), ("amount", "25"), ("carrier", game.wagon.as_str())],
        ),
        WireElement::encode(
            "unloadGoods",
            [("type", "model.goods.furs"), ("amount", "25"), ("carrier", game.wagon.as_str())],
        ),
        WireElement::encode(
            "unloadGoods",
            [("type", "model.goods.furs"), ("amount", "0"), ("carrier", game.wagon.as_str())],
        ),
        WireElement::encode(
            "unloadGoods",
            [("type", "model.goods.tobacco"), ("amount", "5"), ("carrier", game.bob_wagon.as_str())],
        ),
        WireElement::new("foundColony"),
    ];
    for element in script {
        send(&mut alice, element).await?;
    }

    send(
        &mut bob,
        WireElement::encode(
            "unloadGoods",
            [("type", "model.goods.tobacco"), ("amount", "5"), ("carrier", game.bob_wagon.as_str())],
        ),
    )
    .await?;
    send(
        &mut bob,
        WireElement::encode("rename", [("nameable", game.colony.as_str()), ("name", "Bobsville")]),
    )
    .await?;

    let world = game.world.read();
    if let Some(colony) = world.colony(&game.colony) {
        tracing::info!(name = %colony.name, furs = colony.store.count("model.goods.furs"), "final colony");
    }
    Ok(())
}
