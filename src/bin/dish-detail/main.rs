use anyhow::Context;
use dish_menu::{
    client::HttpDishService, config::Config, data::Dish, detail::DishDetail, form::Field, Error,
};

const USAGE: &str = "Usage: dish-detail <dish id> [<author> <rating> <comment...>]";

struct NewComment {
    author: String,
    rating: u8,
    text: String,
}

impl NewComment {
    fn new(args: &[String]) -> Result<Option<Self>, &'static str> {
        match args.len() {
            0 => Ok(None),
            1 | 2 => Err("too less argument"),
            _ => {
                let Ok(rating) = args[1].parse() else {
                    return Err("Can not parse the rating into number");
                };
                Ok(Some(Self {
                    author: args[0].clone(),
                    rating,
                    text: args[2..].join(" "),
                }))
            }
        }
    }
}

fn print_dish(dish: &Dish) {
    println!("{} ({})", dish.name, dish.id);
    if !dish.description.is_empty() {
        println!("{}", dish.description);
    }
    for comment in &dish.comments {
        println!("  {} stars, {}: {} ({})", comment.rating, comment.author, comment.comment, comment.date);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(true)
        .with_file(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("fail to setup logging")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(id) = args.first() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };
    let new_comment = match NewComment::new(&args[1..]) {
        Ok(c) => c,
        Err(hint) => {
            eprintln!("{hint}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    let config = Config::load();
    let mut page = DishDetail::new(HttpDishService::new(config.api_base_url));

    if let Err(e) = page.open(id).await {
        println!("{e}");
        return Ok(());
    }
    if let Some(dish) = page.dish() {
        print_dish(dish);
    }
    if let Some(adjacent) = page.adjacent() {
        println!("prev: {}  next: {}", adjacent.prev, adjacent.next);
    }

    let Some(new_comment) = new_comment else { return Ok(()) };
    let form = page.form_mut();
    form.set_author(new_comment.author);
    form.set_comment(new_comment.text);
    form.set_rating(new_comment.rating);

    let saved = page.submit().await.map(|_| ());
    match saved {
        Ok(()) => {
            println!("\nComment saved.");
            if let Some(dish) = page.dish() {
                print_dish(dish);
            }
        }
        Err(Error::InvalidForm) => {
            for field in Field::ALL {
                let text = page.form().errors().get(field);
                if !text.is_empty() {
                    println!("{}: {text}", field.name());
                }
            }
        }
        Err(e) => println!("{e}"),
    }

    Ok(())
}
