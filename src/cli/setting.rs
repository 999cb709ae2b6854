use crate::store::CatalogStore;
use anyhow::Result;

/// Prints a setting, or stores it when `value` is given.
pub fn run(store: &CatalogStore, key: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(value) => {
            store.put_setting(key, value)?;
            println!("{key} = {value}");
        }
        None => match store.setting(key)? {
            Some(value) => println!("{key} = {value}"),
            None => println!("{key} is not set"),
        },
    }
    Ok(())
}
