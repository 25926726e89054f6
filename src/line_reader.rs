/// 按行读取响应
///
/// 包装带缓冲的读取器，逐行返回响应内容，并累计响应大小的近似值
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// 读取缓冲区大小（4KB），近似大小依赖于该值
pub const READ_BUFFER_SIZE: usize = 4 * 1024;

/// 行读取器
///
/// `approx_size` 是每次取出一行后缓冲区中剩余字节数之和，只是响应大小的
/// 粗略替代值，可能偏大也可能偏小；`bytes_read` 才是实际消费的字节数
pub struct LineReader<R> {
    inner: BufReader<R>,
    line: Vec<u8>,
    approx_size: u64,
    bytes_read: u64,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    /// 使用默认缓冲区大小创建行读取器
    pub fn new(inner: R) -> Self {
        Self::with_capacity(READ_BUFFER_SIZE, inner)
    }

    /// 使用指定缓冲区大小创建行读取器
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner: BufReader::with_capacity(capacity, inner),
            line: Vec::new(),
            approx_size: 0,
            bytes_read: 0,
        }
    }

    /// 读取下一行（不含 `\n` 或 `\r\n`），流结束时返回 `None`
    ///
    /// 末尾没有换行符的残余数据作为最后一行返回
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.line.clear();
        let n = self.inner.read_until(b'\n', &mut self.line).await?;
        if n == 0 {
            return Ok(None);
        }

        self.bytes_read += n as u64;
        self.approx_size += self.inner.buffer().len() as u64;

        let mut end = self.line.len();
        if self.line[..end].ends_with(b"\n") {
            end -= 1;
            if self.line[..end].ends_with(b"\r") {
                end -= 1;
            }
        }

        Ok(Some(String::from_utf8_lossy(&self.line[..end]).into_owned()))
    }

    /// 当前缓冲区中尚未取出的字节数
    pub fn buffered(&self) -> usize {
        self.inner.buffer().len()
    }

    /// 近似响应大小
    pub fn approx_size(&self) -> u64 {
        self.approx_size
    }

    /// 已消费的字节数（包含行结束符）
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_crlf_lines() {
        let data: &[u8] = b"HTTP/1.1 200 OK\r\nServer: test\r\n\r\nbody";
        let mut reader = LineReader::new(data);

        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("HTTP/1.1 200 OK"));
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("Server: test"));
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some(""));
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("body"));
        assert_eq!(reader.next_line().await.unwrap(), None);
        assert_eq!(reader.bytes_read(), data.len() as u64);
    }

    #[tokio::test]
    async fn test_bare_lf_lines() {
        let data: &[u8] = b"one\ntwo\n";
        let mut reader = LineReader::new(data);

        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("one"));
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("two"));
        assert_eq!(reader.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_approx_size_counts_buffered_bytes() {
        // 整个输入一次填入缓冲区：第一行之后剩 4 字节，第二行之后剩 0
        let data: &[u8] = b"a\r\nbb\r\n";
        let mut reader = LineReader::new(data);

        reader.next_line().await.unwrap();
        assert_eq!(reader.buffered(), 4);
        assert_eq!(reader.approx_size(), 4);

        reader.next_line().await.unwrap();
        assert_eq!(reader.approx_size(), 4);
        assert_eq!(reader.bytes_read(), 7);
    }

    #[tokio::test]
    async fn test_approx_size_depends_on_buffer_capacity() {
        let data: &[u8] = b"ab\ncd\n";
        let mut reader = LineReader::with_capacity(4, data);

        while reader.next_line().await.unwrap().is_some() {}

        assert_eq!(reader.approx_size(), 1);
        assert_eq!(reader.bytes_read(), 6);
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let data: &[u8] = b"";
        let mut reader = LineReader::new(data);
        assert_eq!(reader.next_line().await.unwrap(), None);
        assert_eq!(reader.approx_size(), 0);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let data: &[u8] = b"caf\xff\r\n";
        let mut reader = LineReader::new(data);
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("caf\u{fffd}"));
    }
}
