use anyhow::{Context, Result};
use plab_core::expander::expand;
use plab_core::file_storage::FileStorage;
use plab_core::library::PromptLibrary;
use plab_core::prompt::{Prompt, PromptMetadata};
use plab_core::wildcards::{WildcardManager, WildcardNode};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn handle_expand(prompt: &str, json: bool) -> Result<()> {
    let words = expand(prompt).words();
    if json {
        return print_json(&words);
    }
    for word in words {
        println!("{}", word);
    }
    Ok(())
}

pub struct NewPrompt {
    pub name: String,
    pub content: String,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub overwrite: bool,
}

pub fn handle_add(library: &PromptLibrary<FileStorage>, new: NewPrompt) -> Result<()> {
    let metadata = PromptMetadata::new(new.name.clone(), new.description, new.image_path);
    let expansion = library
        .save(Prompt::new(metadata, new.content), new.overwrite)
        .with_context(|| format!("Failed to save prompt '{}'", new.name))?;

    println!("Saved '{}' ({} indexed tag(s))", new.name, expansion.len());
    Ok(())
}

pub fn handle_get(library: &PromptLibrary<FileStorage>, name: &str, copy: bool) -> Result<()> {
    let prompt = library.get(name)?;

    if copy {
        let mut clipboard = arboard::Clipboard::new().context("Failed to access clipboard")?;
        clipboard
            .set_text(prompt.content.clone())
            .context("Failed to copy prompt to clipboard")?;
        log::info!("Copied prompt '{}' to clipboard", name);
    }

    println!("{}", prompt.content);
    Ok(())
}

pub fn handle_list(library: &PromptLibrary<FileStorage>, search: Option<&str>, json: bool) -> Result<()> {
    let prompts = library.list(search)?;
    if json {
        return print_json(&prompts);
    }

    for prompt in prompts {
        let star = if prompt.metadata.favorite { "*" } else { " " };
        match &prompt.metadata.description {
            Some(description) => println!("{} {} - {}", star, prompt.name(), description),
            None => println!("{} {}", star, prompt.name()),
        }
    }
    Ok(())
}

pub fn handle_delete(library: &PromptLibrary<FileStorage>, name: &str) -> Result<()> {
    library.delete(name)?;
    println!("Deleted '{}'", name);
    Ok(())
}

pub fn handle_favorite(library: &PromptLibrary<FileStorage>, name: &str, favorite: bool) -> Result<()> {
    library.set_favorite(name, favorite)?;
    Ok(())
}

pub fn handle_complete(library: &PromptLibrary<FileStorage>, query: &str) -> Result<()> {
    for word in library.autocomplete(query)? {
        println!("{}", word);
    }
    Ok(())
}

pub fn handle_tree(wildcards: &WildcardManager, json: bool) -> Result<()> {
    let tree = wildcards.list_tree()?;
    if json {
        return print_json(&tree);
    }
    print_nodes(&tree, 0);
    Ok(())
}

fn print_nodes(nodes: &[WildcardNode], depth: usize) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            WildcardNode::Folder { name, children, .. } => {
                println!("{}{}/", indent, name);
                print_nodes(children, depth + 1);
            }
            WildcardNode::File { name, .. } => println!("{}{}", indent, name),
        }
    }
}

pub fn handle_show(wildcards: &WildcardManager, path: &str) -> Result<()> {
    print!("{}", wildcards.read_file(path)?);
    Ok(())
}

pub fn handle_write(wildcards: &WildcardManager, path: &str, content: &str) -> Result<()> {
    wildcards.write_file(path, content)?;
    Ok(())
}

pub fn handle_create(wildcards: &WildcardManager, path: &str) -> Result<()> {
    let created = wildcards.create_file(path)?;
    println!("Created {}", created);
    Ok(())
}

pub fn handle_remove(wildcards: &WildcardManager, path: &str) -> Result<()> {
    wildcards.delete_file(path)?;
    println!("Deleted {}", path);
    Ok(())
}

pub fn handle_dedupe(wildcards: &WildcardManager, json: bool) -> Result<()> {
    let moved = wildcards.relocate_duplicates()?;
    if json {
        return print_json(&moved);
    }
    for path in &moved {
        println!("moved {}", path);
    }
    println!("{} duplicate(s) moved", moved.len());
    Ok(())
}

pub fn handle_cleanup(wildcards: &WildcardManager, json: bool) -> Result<()> {
    let report = wildcards.cleanup()?;
    if json {
        return print_json(&report);
    }
    for path in &report.removed_files {
        println!("removed file {}", path);
    }
    for path in &report.removed_dirs {
        println!("removed folder {}", path);
    }
    Ok(())
}
