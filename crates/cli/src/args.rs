//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};

/// stockkeep - inventory records behind a locator-addressed gateway
#[derive(Parser, Debug)]
#[command(name = "stockkeep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database URL (overrides STOCKKEEP_DATABASE_URL)
    #[arg(long, global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every product, optionally filtered by a minimum quantity
    List {
        /// Only products with at least this many in stock
        #[arg(long)]
        min_quantity: Option<i64>,

        /// Column to sort by
        #[arg(long, default_value = "title")]
        sort: String,
    },

    /// Show one product by uuid
    Show { uuid: String },

    /// Add a product with a fresh uuid
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        price: String,

        #[arg(long, default_value_t = 1)]
        quantity: i64,

        #[arg(long)]
        supplier_name: String,

        #[arg(long)]
        supplier_email: String,
    },

    /// Change one column of a product
    Set {
        uuid: String,
        /// title, quantity, price, supplier_name or supplier_email
        field: String,
        value: String,
    },

    /// Remove a product
    Remove { uuid: String },

    /// Print the content type a locator resolves to
    Type { locator: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_defaults() {
        let cli = Cli::try_parse_from([
            "stockkeep",
            "add",
            "--title",
            "Widget",
            "--price",
            "3",
            "--supplier-name",
            "Acme",
            "--supplier-email",
            "a@acme.test",
        ])
        .unwrap();
        assert!(cli.database.is_none());
        match cli.command {
            Command::Add { title, quantity, .. } => {
                assert_eq!(title, "Widget");
                assert_eq!(quantity, 1);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn database_flag_is_global() {
        let cli =
            Cli::try_parse_from(["stockkeep", "show", "u1", "--database", "sqlite://s.db"]).unwrap();
        assert_eq!(cli.database.as_deref(), Some("sqlite://s.db"));
        assert!(matches!(cli.command, Command::Show { uuid } if uuid == "u1"));
    }

    #[test]
    fn set_takes_three_positionals() {
        let cli = Cli::try_parse_from(["stockkeep", "set", "u1", "quantity", "4"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Set { ref field, ref value, .. } if field == "quantity" && value == "4"
        ));
        assert!(Cli::try_parse_from(["stockkeep", "set", "u1", "quantity"]).is_err());
    }
}
