//! 命令注册表
//!
//! 完整命令名、短命令与用户别名到 [`CommandKind`] 的映射，查找不区分大小写。

use crate::commands::CommandKind;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct CommandRegistry {
    /// 完整命令 -> CommandKind
    main_commands: HashMap<String, CommandKind>,
    /// 短命令 -> CommandKind
    short_commands: HashMap<String, CommandKind>,
    /// 用户别名 -> 完整命令
    aliases: HashMap<String, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            main_commands: HashMap::new(),
            short_commands: HashMap::new(),
            aliases: HashMap::new(),
        };

        registry.register(CommandKind::MeasureLine, "MEASURELINE", &["ML"]);
        registry.register(CommandKind::LabelBlocks, "LABELBLOCKS", &["LB"]);
        registry.register(CommandKind::ArrayPath, "ARRAYPATH", &["AP", "ARRAYBLOCKS"]);

        registry
    }

    pub fn register(&mut self, kind: CommandKind, full_cmd: &str, shortcuts: &[&str]) {
        self.main_commands.insert(full_cmd.to_uppercase(), kind);
        for shortcut in shortcuts {
            self.short_commands.insert(shortcut.to_uppercase(), kind);
        }
    }

    /// 依次查完整命令、短命令、别名
    pub fn lookup(&self, input: &str) -> Option<CommandKind> {
        let input_upper = input.trim().to_uppercase();

        if let Some(&kind) = self.main_commands.get(&input_upper) {
            return Some(kind);
        }
        if let Some(&kind) = self.short_commands.get(&input_upper) {
            return Some(kind);
        }
        self.aliases
            .get(&input_upper)
            .and_then(|cmd| self.main_commands.get(cmd).copied())
    }

    /// 以 prefix 开头的完整命令，按字母排序
    pub fn complete(&self, prefix: &str) -> Vec<String> {
        let prefix_upper = prefix.to_uppercase();
        let mut results: Vec<String> = self
            .main_commands
            .keys()
            .filter(|cmd| cmd.starts_with(&prefix_upper))
            .cloned()
            .collect();
        results.sort();
        results
    }

    /// 添加用户别名；不覆盖已有命令，目标命令必须存在
    pub fn add_alias(&mut self, alias: &str, command: &str) -> bool {
        let alias_upper = alias.to_uppercase();
        let command_upper = command.to_uppercase();

        if self.main_commands.contains_key(&alias_upper) || !self.main_commands.contains_key(&command_upper) {
            tracing::warn!("Ignoring alias {} -> {}", alias, command);
            return false;
        }
        self.aliases.insert(alias_upper, command_upper);
        true
    }

    pub fn remove_alias(&mut self, alias: &str) {
        self.aliases.remove(&alias.to_uppercase());
    }

    /// 批量添加别名（来自配置）
    pub fn with_aliases<'a>(mut self, aliases: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        for (alias, command) in aliases {
            self.add_alias(alias, command);
        }
        self
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
