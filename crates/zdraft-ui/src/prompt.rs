//! 交互提示
//!
//! 命令通过 [`Prompter`] 向用户取得选择与输入。每个方法返回 `None` 表示用户取消。
//! - [`ConsolePrompter`]：从文本流逐行读取，空行取默认值
//! - [`ScriptedPrompter`]：按预设应答序列回答，用于测试与批处理

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use zdraft_core::entity::EntityId;

pub trait Prompter {
    fn select_entity(&mut self, prompt: &str) -> Option<EntityId>;

    fn select_entities(&mut self, prompt: &str) -> Option<Vec<EntityId>>;

    fn get_string(&mut self, prompt: &str) -> Option<String>;

    fn get_integer(&mut self, prompt: &str, default: Option<i64>) -> Option<i64>;

    fn get_real(&mut self, prompt: &str, default: Option<f64>) -> Option<f64>;

    /// 在关键字中选择一个，返回关键字原文
    fn get_keyword(&mut self, prompt: &str, keywords: &[&str], default: &str) -> Option<String>;

    /// 向用户输出一行信息
    fn message(&mut self, text: &str);
}

/// 按前缀（不区分大小写）匹配关键字
pub fn match_keyword<'a>(input: &str, keywords: &[&'a str]) -> Option<&'a str> {
    let input = input.trim().to_uppercase();
    if input.is_empty() {
        return None;
    }
    keywords
        .iter()
        .copied()
        .find(|k| k.to_uppercase().starts_with(&input))
}

/// 预设应答
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Entity(EntityId),
    Entities(Vec<EntityId>),
    Text(String),
    Integer(i64),
    Real(f64),
    /// 接受默认值
    Default,
    Cancel,
}

/// 按顺序使用预设应答；应答用尽或类型不符视为取消
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    messages: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// 尚未使用的应答数量
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, prompt: &str) -> Answer {
        let answer = self.answers.pop_front().unwrap_or(Answer::Cancel);
        tracing::debug!("{} -> {:?}", prompt, answer);
        answer
    }
}

impl Prompter for ScriptedPrompter {
    fn select_entity(&mut self, prompt: &str) -> Option<EntityId> {
        match self.next_answer(prompt) {
            Answer::Entity(id) => Some(id),
            _ => None,
        }
    }

    fn select_entities(&mut self, prompt: &str) -> Option<Vec<EntityId>> {
        match self.next_answer(prompt) {
            Answer::Entities(ids) => Some(ids),
            Answer::Entity(id) => Some(vec![id]),
            _ => None,
        }
    }

    fn get_string(&mut self, prompt: &str) -> Option<String> {
        match self.next_answer(prompt) {
            Answer::Text(text) => Some(text),
            Answer::Default => Some(String::new()),
            _ => None,
        }
    }

    fn get_integer(&mut self, prompt: &str, default: Option<i64>) -> Option<i64> {
        match self.next_answer(prompt) {
            Answer::Integer(value) => Some(value),
            Answer::Default => default,
            _ => None,
        }
    }

    fn get_real(&mut self, prompt: &str, default: Option<f64>) -> Option<f64> {
        match self.next_answer(prompt) {
            Answer::Real(value) => Some(value),
            Answer::Integer(value) => Some(value as f64),
            Answer::Default => default,
            _ => None,
        }
    }

    fn get_keyword(&mut self, prompt: &str, keywords: &[&str], default: &str) -> Option<String> {
        match self.next_answer(prompt) {
            Answer::Text(text) => match_keyword(&text, keywords).map(str::to_string),
            Answer::Default => Some(default.to_string()),
            _ => None,
        }
    }

    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }
}

/// 基于文本流的提示
///
/// 实体以 ID 数字输入，多选用逗号或空格分隔；输入流结束视为取消。
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// 输出提示并读取一行；EOF 返回 `None`
    fn ask(&mut self, prompt: &str) -> Option<String> {
        write!(self.output, "{} ", prompt).ok()?;
        self.output.flush().ok()?;
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    /// 反复询问直到解析成功；空行返回默认值（若有）
    fn ask_parsed<T: Copy>(
        &mut self,
        prompt: &str,
        default: Option<T>,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        loop {
            let line = self.ask(prompt)?;
            if line.is_empty() {
                if default.is_some() {
                    return default;
                }
                continue;
            }
            match parse(&line) {
                Some(value) => return Some(value),
                None => self.message(&format!("Invalid value: {}", line)),
            }
        }
    }
}

fn parse_ids(line: &str) -> Option<Vec<EntityId>> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_start_matches('#').parse::<u64>().ok().map(EntityId::new))
        .collect()
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn select_entity(&mut self, prompt: &str) -> Option<EntityId> {
        self.ask_parsed(prompt, None, |s| match parse_ids(s)?.as_slice() {
            [id] => Some(*id),
            _ => None,
        })
    }

    fn select_entities(&mut self, prompt: &str) -> Option<Vec<EntityId>> {
        loop {
            let line = self.ask(prompt)?;
            match parse_ids(&line) {
                Some(ids) => return Some(ids),
                None => self.message(&format!("Invalid selection: {}", line)),
            }
        }
    }

    fn get_string(&mut self, prompt: &str) -> Option<String> {
        self.ask(prompt)
    }

    fn get_integer(&mut self, prompt: &str, default: Option<i64>) -> Option<i64> {
        let prompt = match default {
            Some(d) => format!("{} <{}>:", prompt, d),
            None => format!("{}:", prompt),
        };
        self.ask_parsed(&prompt, default, |s| s.parse().ok())
    }

    fn get_real(&mut self, prompt: &str, default: Option<f64>) -> Option<f64> {
        let prompt = match default {
            Some(d) => format!("{} <{}>:", prompt, d),
            None => format!("{}:", prompt),
        };
        self.ask_parsed(&prompt, default, |s| s.parse::<f64>().ok().filter(|v| v.is_finite()))
    }

    fn get_keyword(&mut self, prompt: &str, keywords: &[&str], default: &str) -> Option<String> {
        let prompt = format!("{} [{}] <{}>:", prompt, keywords.join("/"), default);
        loop {
            let line = self.ask(&prompt)?;
            if line.is_empty() {
                return Some(default.to_string());
            }
            match match_keyword(&line, keywords) {
                Some(k) => return Some(k.to_string()),
                None => self.message(&format!("Invalid option keyword: {}", line)),
            }
        }
    }

    fn message(&mut self, text: &str) {
        // 输出失败不影响命令本身
        let _ = writeln!(self.output, "{}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_match_keyword_prefix() {
        assert_eq!(match_keyword("s", &["Count", "Spacing"]), Some("Spacing"));
        assert_eq!(match_keyword("COUNT", &["Count", "Spacing"]), Some("Count"));
        assert_eq!(match_keyword("x", &["Count", "Spacing"]), None);
        assert_eq!(match_keyword("", &["Count"]), None);
    }

    #[test]
    fn test_scripted_defaults_and_cancel() {
        let mut p = ScriptedPrompter::new([Answer::Default, Answer::Integer(4), Answer::Text("n".into())]);
        assert_eq!(p.get_real("Scale", Some(2.0)), Some(2.0));
        assert_eq!(p.get_real("Spacing", None), Some(4.0));
        assert_eq!(p.get_keyword("Align?", &["Yes", "No"], "Yes").as_deref(), Some("No"));
        assert_eq!(p.select_entity("Path"), None);
    }

    #[test]
    fn test_console_reads_values() {
        let input = Cursor::new("#7\n\nabc\n12\n3, 4 5\ns\n");
        let mut output = Vec::new();
        let mut p = ConsolePrompter::new(input, &mut output);

        assert_eq!(p.select_entity("Select path:"), Some(EntityId::new(7)));
        assert_eq!(p.get_real("Scale", Some(1.5)), Some(1.5));
        assert_eq!(p.get_integer("Count", None), Some(12));
        assert_eq!(
            p.select_entities("Select blocks:"),
            Some(vec![EntityId::new(3), EntityId::new(4), EntityId::new(5)])
        );
        assert_eq!(p.get_keyword("Mode", &["Count", "Spacing"], "Count").as_deref(), Some("Spacing"));
        assert_eq!(p.get_string("Name:"), None);

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Invalid value: abc"));
    }
}
