use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use time::{macros::format_description, Date, OffsetDateTime};
use tracing::warn;

use food_diary::{
    meals::{MealComposer, MealId, MealPersistence, MealRecord},
    nutrition::{
        recommended_intake,
        targets::{ActivityLevel, Aim, Gender},
        BodyProfile, MealTotals,
    },
    products::{NewProduct, ProductCatalog, ProductChanges, ProductId, ProductSearch},
    ApiClient, ClientConfig,
};

#[derive(Debug, Parser)]
#[command(name = "food-diary", version, about = "Log meals against a food-diary service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print an access token for the given credentials
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and print its access token
    Register {
        login: String,
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Search the product catalog by name
    Search { query: Vec<String> },
    /// Build a meal from searched products and save it
    Compose(ComposeArgs),
    /// List meals logged on a day (defaults to today)
    Meals {
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },
    /// Delete a meal
    Delete { id: i64 },
    /// Daily calorie and macro targets for a body profile
    Targets(TargetsArgs),
    /// Manage your own products
    Product {
        #[command(subcommand)]
        action: ProductCommand,
    },
    /// Record today's body weight, or show the recent log
    Weight {
        /// Kilograms to record for today
        kg: Option<f64>,
    },
}

#[derive(Debug, Subcommand)]
enum ProductCommand {
    /// Add a product; nutrients are per 100 g
    Add {
        name: String,
        #[command(flatten)]
        nutrients: NutrientArgs,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change fields of one of your products
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        calories: Option<f64>,
        #[arg(long)]
        proteins: Option<f64>,
        #[arg(long)]
        fats: Option<f64>,
        #[arg(long)]
        carbohydrates: Option<f64>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete one of your products
    Delete { id: i64 },
    /// List your products
    Mine,
}

#[derive(Debug, Args)]
struct NutrientArgs {
    #[arg(long)]
    calories: f64,
    #[arg(long)]
    proteins: f64,
    #[arg(long)]
    fats: f64,
    #[arg(long)]
    carbohydrates: f64,
}

#[derive(Debug, Args)]
struct ComposeArgs {
    #[arg(long)]
    name: String,
    /// QUERY[=GRAMS], repeatable; the first search hit is used
    #[arg(long = "item", value_parser = parse_item)]
    items: Vec<ItemArg>,
    /// Edit this stored meal instead of creating a new one
    #[arg(long)]
    edit: Option<i64>,
    /// Day the edited meal was logged on (defaults to today)
    #[arg(long, value_parser = parse_date, requires = "edit")]
    date: Option<Date>,
    /// Product id to drop from the edited meal, repeatable
    #[arg(long = "remove")]
    remove: Vec<i64>,
    /// Print the totals without saving
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone)]
struct ItemArg {
    query: String,
    grams: Option<String>,
}

/// Metrics left out are taken from the signed-in user's profile.
#[derive(Debug, Args)]
struct TargetsArgs {
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    #[arg(long)]
    age: Option<u32>,
    #[arg(long)]
    gender: Option<Gender>,
    #[arg(long)]
    activity: Option<ActivityLevel>,
    #[arg(long)]
    aim: Option<Aim>,
    /// Also show what is left after the meals logged on this day
    #[arg(long, value_parser = parse_date)]
    eaten_on: Option<Date>,
}

fn parse_item(raw: &str) -> Result<ItemArg, String> {
    let (query, grams) = match raw.rsplit_once('=') {
        Some((q, g)) => (q, Some(g.to_string())),
        None => (raw, None),
    };
    let query = query.trim();
    if query.is_empty() {
        return Err("item needs a product name".into());
    }
    Ok(ItemArg {
        query: query.to_string(),
        grams,
    })
}

fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "food_diary=info,reqwest=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;
    let client = ApiClient::new(&config).context("build http client")?;

    if let Some(claims) = client.auth().claims() {
        tracing::debug!(user = %claims.sub, "using stored access token");
    }
    if client.auth().is_expired() {
        warn!("access token looks expired; requests may be rejected");
    }

    match cli.command {
        Command::Login { username, password } => {
            let token = client.login(&username, &password).await?;
            println!("{token}");
        }
        Command::Register { login, email, password } => {
            let token = client.register(&login, &email, &password).await?;
            println!("{token}");
        }
        Command::Search { query } => {
            let products = client.search(&query.join(" ")).await?;
            if products.is_empty() {
                println!("no products found");
            }
            for p in products {
                println!(
                    "{:>6}  {}  ({} kcal/100g, P {} F {} C {})",
                    p.id, p.name, p.calories, p.proteins, p.fats, p.carbohydrates
                );
            }
        }
        Command::Compose(args) => compose(&client, args).await?,
        Command::Meals { date } => {
            let date = date.unwrap_or_else(today);
            let meals = client.list_by_date(date).await?;
            if meals.is_empty() {
                println!("no meals on {date}");
            }
            for meal in &meals {
                print_meal(meal);
            }
        }
        Command::Delete { id } => {
            client.delete(MealId(id)).await?;
            println!("deleted meal {id}");
        }
        Command::Targets(args) => targets(&client, args).await?,
        Command::Product { action } => product(&client, action).await?,
        Command::Weight { kg: Some(kg) } => {
            let entry = client.record_weight(kg).await?;
            println!(
                "recorded {} kg on {}",
                entry.weight_kg.unwrap_or(kg),
                entry.recorded_at.unwrap_or_else(today)
            );
        }
        Command::Weight { kg: None } => {
            let history = client.weight_history().await?;
            if history.is_empty() {
                println!("no weight entries");
            }
            for entry in history {
                let day = entry.recorded_at.map(|d| d.to_string()).unwrap_or_default();
                match entry.weight_kg {
                    Some(kg) => println!("{day:<10}  {kg:>6.1} kg"),
                    None => println!("{day:<10}       -"),
                }
            }
        }
    }

    Ok(())
}

async fn compose(client: &ApiClient, args: ComposeArgs) -> anyhow::Result<()> {
    let existing = match args.edit {
        Some(id) => {
            let date = args.date.unwrap_or_else(today);
            let meals = client.list_by_date(date).await?;
            let meal = meals
                .into_iter()
                .find(|m| m.id == MealId(id))
                .with_context(|| format!("meal {id} not found on {date}"))?;
            Some(meal)
        }
        None => None,
    };

    let mut composer = MealComposer::initialize(existing.as_ref());
    for id in args.remove {
        if !composer.remove_product(ProductId(id)) {
            warn!(product_id = id, "product not in meal");
        }
    }

    // Searches run one at a time, so a result always belongs to its own query.
    for item in &args.items {
        let Some(product) = client.search(&item.query).await?.into_iter().next() else {
            warn!(query = %item.query, "no product found");
            continue;
        };
        let id = product.id;
        composer.add_product(product);
        if let Some(grams) = &item.grams {
            composer.update_weight(id, grams.as_str());
        }
    }

    for p in composer.selected() {
        println!(
            "{:<30} {:>7} g {:>6} kcal",
            p.product.name,
            p.weight_grams,
            food_diary::nutrition::scale(p.product.calories, p.weight_grams).round()
        );
    }
    print_totals(&composer.compute_totals());

    let meal = composer
        .to_save_payload(&args.name)
        .map_err(food_diary::Error::from)?;
    if args.dry_run {
        return Ok(());
    }
    let saved = client.save(&meal).await?;
    println!("saved meal {}", saved.id);
    Ok(())
}

async fn targets(client: &ApiClient, args: TargetsArgs) -> anyhow::Result<()> {
    let profile = match (args.weight, args.height, args.age, args.gender) {
        (Some(weight_kg), Some(height_cm), Some(age_years), Some(gender)) => BodyProfile {
            weight_kg,
            height_cm,
            age_years,
            gender,
            activity: args.activity.unwrap_or(ActivityLevel::Moderate),
            aim: args.aim.unwrap_or(Aim::Maintain),
        },
        _ => {
            let stored = client
                .current_user()
                .await?
                .body_profile()
                .context("complete your profile or pass every metric")?;
            BodyProfile {
                weight_kg: args.weight.unwrap_or(stored.weight_kg),
                height_cm: args.height.unwrap_or(stored.height_cm),
                age_years: args.age.unwrap_or(stored.age_years),
                gender: args.gender.unwrap_or(stored.gender),
                activity: args.activity.unwrap_or(stored.activity),
                aim: args.aim.unwrap_or(stored.aim),
            }
        }
    };
    let daily = recommended_intake(&profile);
    println!(
        "daily: {} kcal, P {} g, F {} g, C {} g",
        daily.calories, daily.proteins, daily.fats, daily.carbohydrates
    );

    if let Some(date) = args.eaten_on {
        let meals = client.list_by_date(date).await?;
        let eaten = meals.iter().fold(MealTotals::default(), |acc, m| MealTotals {
            weight_grams: acc.weight_grams + m.totals.weight_grams,
            calories: acc.calories + m.totals.calories,
            proteins: acc.proteins + m.totals.proteins,
            fats: acc.fats + m.totals.fats,
            carbohydrates: acc.carbohydrates + m.totals.carbohydrates,
        });
        let left = daily.remaining(&eaten);
        println!(
            "left on {date}: {:.0} kcal, P {:.1} g, F {:.1} g, C {:.1} g",
            left.calories, left.proteins, left.fats, left.carbohydrates
        );
    }
    Ok(())
}

async fn product(client: &ApiClient, action: ProductCommand) -> anyhow::Result<()> {
    match action {
        ProductCommand::Add {
            name,
            nutrients,
            description,
        } => {
            let created = client
                .create_product(&NewProduct {
                    name,
                    calories: nutrients.calories,
                    proteins: nutrients.proteins,
                    fats: nutrients.fats,
                    carbohydrates: nutrients.carbohydrates,
                    description,
                })
                .await?;
            println!("added product {} ({})", created.id, created.name);
        }
        ProductCommand::Edit {
            id,
            name,
            calories,
            proteins,
            fats,
            carbohydrates,
            description,
        } => {
            let changes = ProductChanges {
                name,
                calories,
                proteins,
                fats,
                carbohydrates,
                description,
            };
            if changes.is_empty() {
                anyhow::bail!("nothing to change");
            }
            let updated = client.update_product(ProductId(id), &changes).await?;
            println!("updated product {} ({})", updated.id, updated.name);
        }
        ProductCommand::Delete { id } => {
            let removed = client.delete_product(ProductId(id)).await?;
            println!("deleted product {} ({})", removed.id, removed.name);
        }
        ProductCommand::Mine => {
            let products = client.my_products().await?;
            if products.is_empty() {
                println!("no personal products");
            }
            for p in products {
                println!(
                    "{:>6}  {}  ({} kcal/100g, P {} F {} C {})",
                    p.id, p.name, p.calories, p.proteins, p.fats, p.carbohydrates
                );
            }
        }
    }
    Ok(())
}

fn print_meal(meal: &MealRecord) {
    println!("#{} {}", meal.id, meal.name);
    for p in &meal.products {
        println!("    {:<30} {:>7} g {:>6.0} kcal", p.name, p.weight_grams, p.calories);
    }
    print_totals(&meal.totals);
}

fn print_totals(t: &MealTotals) {
    println!(
        "total: {:.0} g, {:.0} kcal, P {:.1} g, F {:.1} g, C {:.1} g",
        t.weight_grams, t.calories, t.proteins, t.fats, t.carbohydrates
    );
}
